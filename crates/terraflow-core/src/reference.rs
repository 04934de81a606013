//! 出力参照
//!
//! 宣言済みリソースの出力を、後続リソースの入力として渡すための
//! シンボリック参照です。出力値の実体はまだ存在しないため、参照は
//! `${<type>.<name>.<attribute>}` 形式の式文字列として表現され、
//! 解決は最終ドキュメントを消費する外部 apply ツールに委ねられます。
//!
//! 参照の出力名セットはリソース種別ごとの静的な表で決まり、宣言時に
//! どの任意フィールドを与えたかには依存しません。

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::validate::ValidatedAttributes;

/// `${...}` 形式の参照式
static EXPRESSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$\{[^}]+\}$").expect("expression pattern is valid"));

/// 文字列が参照式かどうか
///
/// バリデータはこれに一致する文字列を、型検査を通さず不透明な値として
/// 受け入れる（ネストブロックを除く）。
pub fn is_expression(value: &str) -> bool {
    EXPRESSION.is_match(value)
}

/// 出力属性への参照式を組み立てる
pub fn expression(resource_type: &str, name: &str, attribute: &str) -> String {
    format!("${{{resource_type}.{name}.{attribute}}}")
}

/// 宣言成功時に返される読み取り専用ハンドル
///
/// `outputs` のキー集合はリソース種別の静的な出力表そのもので、宣言に
/// 使った属性によらず常に同一。値は参照式文字列で、そのまま後続の
/// 宣言の生属性として渡せる。
#[derive(Debug, Clone)]
pub struct Reference {
    resource_type: String,
    name: String,
    outputs: IndexMap<String, String>,
    raw: ValidatedAttributes,
}

impl Reference {
    pub(crate) fn new(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        output_names: &[&str],
        raw: ValidatedAttributes,
    ) -> Self {
        let resource_type = resource_type.into();
        let name = name.into();
        let outputs = output_names
            .iter()
            .map(|attr| {
                (
                    (*attr).to_string(),
                    expression(&resource_type, &name, attr),
                )
            })
            .collect();
        Self {
            resource_type,
            name,
            outputs,
            raw,
        }
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 出力名 → 参照式（静的な宣言順）
    pub fn outputs(&self) -> &IndexMap<String, String> {
        &self.outputs
    }

    /// 1つの出力の参照式を引く
    pub fn output(&self, name: &str) -> Option<&str> {
        self.outputs.get(name).map(String::as_str)
    }

    /// 検証済み属性を1つ引く（デフォルト注入後の値）
    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.raw.get(name)
    }

    /// 宣言に使われた検証済み属性
    pub fn raw(&self) -> &ValidatedAttributes {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldKind, FieldSpec, Schema};
    use crate::validate::validate;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_expression_format() {
        assert_eq!(
            expression("hcloud_volume", "data", "id"),
            "${hcloud_volume.data.id}"
        );
    }

    #[test]
    fn test_is_expression() {
        assert!(is_expression("${hcloud_volume.data.id}"));
        assert!(is_expression("${a}"));
        assert!(!is_expression("plain string"));
        assert!(!is_expression("${}"));
        assert!(!is_expression("prefix ${a.b.c}"));
        assert!(!is_expression("${a.b.c} suffix"));
    }

    #[test]
    fn test_outputs_follow_static_declaration() {
        let schema = Arc::new(
            Schema::builder()
                .field(FieldSpec::required("name", FieldKind::Str))
                .field(FieldSpec::optional("location", FieldKind::Str))
                .build()
                .unwrap(),
        );
        // 任意フィールドを与えない最小の宣言
        let validated = validate(&schema, &json!({"name": "data"})).unwrap();
        let reference = Reference::new(
            "hcloud_volume",
            "data",
            &["id", "size", "linux_device"],
            validated,
        );

        let names: Vec<&str> = reference.outputs().keys().map(String::as_str).collect();
        assert_eq!(names, vec!["id", "size", "linux_device"]);
        assert_eq!(
            reference.output("linux_device"),
            Some("${hcloud_volume.data.linux_device}")
        );
        assert_eq!(reference.output("unknown"), None);
    }

    #[test]
    fn test_reference_keeps_raw_attributes() {
        let schema = Arc::new(
            Schema::builder()
                .field(FieldSpec::required("name", FieldKind::Str))
                .build()
                .unwrap(),
        );
        let validated = validate(&schema, &json!({"name": "data"})).unwrap();
        let reference = Reference::new("hcloud_volume", "data", &["id"], validated);

        assert_eq!(reference.raw().get("name"), Some(&json!("data")));
        assert_eq!(reference.attr("name"), Some(&json!("data")));
        assert_eq!(reference.attr("missing"), None);
        assert_eq!(reference.resource_type(), "hcloud_volume");
        assert_eq!(reference.name(), "data");
    }
}
