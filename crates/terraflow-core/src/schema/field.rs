//! フィールド定義
//!
//! スキーマを構成する個々のフィールドの型・制約・デフォルト値を定義します。

use std::sync::Arc;

use regex::Regex;
use serde_json::Value;

use crate::error::SchemaError;

use super::Schema;

/// フィールドの宣言型
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// 任意の文字列
    Str,
    /// 64bit 整数
    Int,
    /// 数値（整数リテラルも受け付ける）
    Float,
    /// 真偽値
    Bool,
    /// 候補値のいずれかに一致する文字列
    Enum(Vec<String>),
    /// 範囲付き整数 (min..=max)
    IntRange { min: i64, max: i64 },
    /// 正規表現パターンに一致する文字列
    Pattern { pattern: String, regex: Regex },
    /// ネストしたスキーマ（Arc で参照共有し、複製しない）
    Nested(Arc<Schema>),
    /// 要素型 T のリスト
    List(Box<FieldKind>),
    /// 値型 V のマップ（キーは文字列、自由形式）
    Map(Box<FieldKind>),
}

impl FieldKind {
    /// 候補値リストから enum 型を作る
    pub fn enum_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldKind::Enum(values.into_iter().map(Into::into).collect())
    }

    /// 範囲付き整数型を作る
    pub fn int_range(min: i64, max: i64) -> Self {
        FieldKind::IntRange { min, max }
    }

    /// パターン制約付き文字列型を作る
    ///
    /// パターンのコンパイル失敗はスキーマ定義ミスとして即座に返す。
    pub fn pattern(pattern: &str) -> Result<Self, SchemaError> {
        let regex = Regex::new(pattern).map_err(|e| SchemaError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(FieldKind::Pattern {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// ネストスキーマ型を作る
    pub fn nested(schema: &Arc<Schema>) -> Self {
        FieldKind::Nested(Arc::clone(schema))
    }

    /// リスト型を作る
    pub fn list(inner: FieldKind) -> Self {
        FieldKind::List(Box::new(inner))
    }

    /// マップ型を作る
    pub fn map(value: FieldKind) -> Self {
        FieldKind::Map(Box::new(value))
    }

    /// 型名（エラーメッセージ用）
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Str | FieldKind::Enum(_) | FieldKind::Pattern { .. } => "string",
            FieldKind::Int | FieldKind::IntRange { .. } => "integer",
            FieldKind::Float => "number",
            FieldKind::Bool => "bool",
            FieldKind::Nested(_) => "block",
            FieldKind::List(_) => "list",
            FieldKind::Map(_) => "map",
        }
    }

    /// 参照式 `${...}` をそのまま受け入れられる型かどうか
    ///
    /// 値の解決は外部 apply ツールの責務なので、スカラー・リスト・マップは
    /// 参照式を不透明な文字列として通す。ネストブロックだけは構造そのもの
    /// なので参照では渡せない。
    pub(crate) fn accepts_expression(&self) -> bool {
        match self {
            FieldKind::Nested(_) => false,
            FieldKind::List(inner) => !matches!(**inner, FieldKind::Nested(_)),
            _ => true,
        }
    }
}

/// フィールド仕様
///
/// 不変条件: 必須フィールドはデフォルト値を持たない。任意フィールドは
/// デフォルト値を持ち、`Null` デフォルトは「未指定なら出力から省略」を
/// 意味する。この不変条件は `SchemaBuilder::build` が検査する。
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    kind: FieldKind,
    required: bool,
    default: Value,
}

impl FieldSpec {
    /// 必須フィールドを定義する
    pub fn required(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            default: Value::Null,
        }
    }

    /// 任意フィールドを定義する（未指定なら出力から省略される）
    pub fn optional(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            default: Value::Null,
        }
    }

    /// デフォルト値を設定する
    ///
    /// 必須フィールドへの指定は `SchemaBuilder::build` で
    /// `SchemaError::RequiredWithDefault` になる。
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = default;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// デフォルト値（`Null` はデフォルトなしを意味する）
    pub fn default(&self) -> &Value {
        &self.default
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_has_no_default() {
        let spec = FieldSpec::required("name", FieldKind::Str);
        assert!(spec.is_required());
        assert!(spec.default().is_null());
    }

    #[test]
    fn test_optional_with_default() {
        let spec = FieldSpec::optional("delete_protection", FieldKind::Bool)
            .with_default(json!(false));
        assert!(!spec.is_required());
        assert_eq!(spec.default(), &json!(false));
    }

    #[test]
    fn test_pattern_compile_error() {
        let result = FieldKind::pattern(r"[invalid");
        assert!(matches!(result, Err(SchemaError::InvalidPattern { .. })));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(FieldKind::Str.type_name(), "string");
        assert_eq!(FieldKind::int_range(1, 10).type_name(), "integer");
        assert_eq!(FieldKind::list(FieldKind::Str).type_name(), "list");
        assert_eq!(FieldKind::map(FieldKind::Str).type_name(), "map");
    }

    #[test]
    fn test_accepts_expression() {
        assert!(FieldKind::Str.accepts_expression());
        assert!(FieldKind::int_range(10, 10000).accepts_expression());
        assert!(FieldKind::list(FieldKind::Str).accepts_expression());

        let nested = Arc::new(Schema::builder().build().unwrap());
        assert!(!FieldKind::nested(&nested).accepts_expression());
        assert!(!FieldKind::list(FieldKind::nested(&nested)).accepts_expression());
    }
}
