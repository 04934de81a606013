use thiserror::Error;

use crate::validate::FieldPath;

/// スキーマ定義エラー
///
/// スキーマ構築時に検出されるプログラミングエラー。実行時入力の問題では
/// ないため、バリデーションエラーとは型レベルで区別される。カタログ側は
/// 静的スキーマの構築で `expect` してよい（定義ミスは即座に落とすべき）。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("フィールド名が重複しています: {0}")]
    DuplicateField(String),

    #[error("必須フィールドにデフォルト値は指定できません: {0}")]
    RequiredWithDefault(String),

    #[error("enum に候補値がありません: {0}")]
    EmptyEnum(String),

    #[error("数値範囲が不正です: {field} (min {min} > max {max})")]
    InvalidBounds { field: String, min: i64, max: i64 },

    #[error("正規表現パターンが不正です: {pattern}\n理由: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("不変条件が未定義のフィールドを参照しています: {0}")]
    UnknownInvariantField(String),

    #[error("不変条件に対象フィールドがありません")]
    EmptyInvariant,
}

/// バリデーションエラー（1件分）
///
/// フィールドパスと人間可読メッセージを必ず持つ。独立したフィールドの
/// エラーは最初の1件で打ち切らず、`ValidationErrors` に全件収集される。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{path}: 必須フィールドがありません")]
    MissingRequiredField { path: FieldPath },

    #[error("{path}: 型が一致しません (期待: {expected}, 実際: {actual})")]
    TypeMismatch {
        path: FieldPath,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("{path}: {message}")]
    ConstraintViolation { path: FieldPath, message: String },

    #[error("不変条件違反 {fields:?}: {message}")]
    CrossFieldInvariant {
        fields: Vec<String>,
        message: String,
    },
}

impl ValidationError {
    /// エラーが指すフィールドパス（クロスフィールド違反は None）
    pub fn path(&self) -> Option<&FieldPath> {
        match self {
            ValidationError::MissingRequiredField { path }
            | ValidationError::TypeMismatch { path, .. }
            | ValidationError::ConstraintViolation { path, .. } => Some(path),
            ValidationError::CrossFieldInvariant { .. } => None,
        }
    }
}

/// バリデーションエラーの集約リスト
///
/// 1回の `validate` 呼び出しで見つかったエラーをすべて保持する。
#[derive(Error, Debug, Clone, PartialEq)]
#[error("バリデーションエラー {} 件: {}", .0.len(), format_errors(.0))]
pub struct ValidationErrors(Vec<ValidationError>);

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }
}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self(errors)
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// TerraFlow コアのエラー型
#[derive(Error, Debug)]
pub enum TerraError {
    /// スキーマバリデーション失敗（エラーは全件収集される）
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// 同じ (type, name) の組での二重宣言。ドキュメントは変更されない
    #[error("リソースが二重に宣言されています: {resource_type} \"{name}\"")]
    DuplicateDeclaration { resource_type: String, name: String },

    #[error("ドキュメント書き出しエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON シリアライズエラー: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TerraError>;
