//! 属性バリデーション
//!
//! 生の属性マップをスキーマと突き合わせ、検証済み属性セットを生成します。
//! 独立したフィールドのエラーは最初の1件で打ち切らず全件収集し、
//! クロスフィールド不変条件はフィールド単位の検査がすべて通った階層で
//! のみ評価します。
//!
//! 暗黙の型変換は行いません。宣言されたデフォルト値の注入だけが
//! 入力に対する唯一の補完です。

mod path;


pub use path::FieldPath;

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ValidationError, ValidationErrors};
use crate::reference;
use crate::schema::{FieldKind, Schema};

/// 検証済み属性セット
///
/// `validate` だけが生成できる。保持する値はスキーマ宣言順に並び、
/// デフォルト値の注入が済んでいて、すべてのフィールド仕様と不変条件を
/// 満たすことが保証される。
#[derive(Debug, Clone)]
pub struct ValidatedAttributes {
    schema: Arc<Schema>,
    values: Map<String, Value>,
}

impl ValidatedAttributes {
    /// フィールド値を引く（省略された任意フィールドは None）
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// 検証済みの値（スキーマ宣言順）
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// この属性セットを生成したスキーマ
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }
}

/// 生の属性マップをスキーマに対して検証する
///
/// 成功なら検証済み属性セット、失敗なら見つかったエラーの全件リストを
/// 返す。入力は変更しない（純粋関数）。
///
/// - 未指定の必須フィールドは `MissingRequiredField`
/// - 未指定の任意フィールドはデフォルト値を注入（`Null` デフォルトは省略）
/// - 明示的な `null` は未指定と同じ扱い
/// - スキーマに無いフィールドは閉世界ポリシーで拒否
/// - `${...}` 形式の文字列は参照式として解決せずに通す（ネストブロックを除く）
pub fn validate(
    schema: &Arc<Schema>,
    attrs: &Value,
) -> Result<ValidatedAttributes, ValidationErrors> {
    let root = FieldPath::root();
    let Some(object) = attrs.as_object() else {
        return Err(vec![ValidationError::TypeMismatch {
            path: root,
            expected: "block",
            actual: json_type_name(attrs),
        }]
        .into());
    };

    let mut errors = Vec::new();
    let values = check_object(schema, object, &root, &mut errors);

    if !errors.is_empty() {
        debug!(error_count = errors.len(), "Attribute validation failed");
        return Err(errors.into());
    }

    Ok(ValidatedAttributes {
        schema: Arc::clone(schema),
        values,
    })
}

/// 1階層分の属性マップを検査する
///
/// スキーマ宣言順にフィールドを走査して検証済みマップを組み立て、
/// 見つかったエラーを `errors` へ追記する。不変条件はこの階層で
/// フィールド単位のエラーがゼロだったときだけ評価する。
fn check_object(
    schema: &Schema,
    object: &Map<String, Value>,
    base: &FieldPath,
    errors: &mut Vec<ValidationError>,
) -> Map<String, Value> {
    let before = errors.len();
    let mut values = Map::new();

    for spec in schema.fields() {
        let path = base.child(spec.name());
        match object.get(spec.name()) {
            Some(value) if !value.is_null() => {
                if let Some(checked) = check_value(spec.kind(), value, &path, errors) {
                    values.insert(spec.name().to_string(), checked);
                }
            }
            // 明示的な null は未指定と同じ扱い
            _ => {
                if spec.is_required() {
                    errors.push(ValidationError::MissingRequiredField { path });
                } else if !spec.default().is_null() {
                    values.insert(spec.name().to_string(), spec.default().clone());
                }
            }
        }
    }

    for key in object.keys() {
        if schema.field(key).is_none() {
            errors.push(ValidationError::ConstraintViolation {
                path: base.child(key),
                message: "スキーマに定義されていないフィールドです".to_string(),
            });
        }
    }

    if errors.len() == before {
        for invariant in schema.invariants() {
            if let Err(error) = invariant.check(&values, base) {
                errors.push(error);
            }
        }
    }

    values
}

/// 1つの値をフィールド型に対して検査する
///
/// 成功なら検証済みの値（ネストはデフォルト注入済み）を返し、失敗なら
/// `errors` へ追記して None を返す。
fn check_value(
    kind: &FieldKind,
    value: &Value,
    path: &FieldPath,
    errors: &mut Vec<ValidationError>,
) -> Option<Value> {
    // 参照式は下流ツールが解決するので、不透明な文字列として通す
    if kind.accepts_expression()
        && value.as_str().is_some_and(reference::is_expression)
    {
        return Some(value.clone());
    }

    match kind {
        FieldKind::Str => match value.as_str() {
            Some(_) => Some(value.clone()),
            None => {
                errors.push(mismatch(path, "string", value));
                None
            }
        },
        FieldKind::Int => match value.as_i64() {
            Some(_) => Some(value.clone()),
            None => {
                errors.push(mismatch(path, "integer", value));
                None
            }
        },
        FieldKind::Float => match value.as_f64() {
            Some(_) => Some(value.clone()),
            None => {
                errors.push(mismatch(path, "number", value));
                None
            }
        },
        FieldKind::Bool => match value.as_bool() {
            Some(_) => Some(value.clone()),
            None => {
                errors.push(mismatch(path, "bool", value));
                None
            }
        },
        FieldKind::Enum(candidates) => match value.as_str() {
            None => {
                errors.push(mismatch(path, "string", value));
                None
            }
            Some(s) if !candidates.iter().any(|c| c == s) => {
                errors.push(ValidationError::ConstraintViolation {
                    path: path.clone(),
                    message: format!(
                        "\"{s}\" は候補値のいずれでもありません (候補: {})",
                        candidates.join(", ")
                    ),
                });
                None
            }
            Some(_) => Some(value.clone()),
        },
        FieldKind::IntRange { min, max } => match value.as_i64() {
            None => {
                errors.push(mismatch(path, "integer", value));
                None
            }
            Some(n) if n < *min || n > *max => {
                errors.push(ValidationError::ConstraintViolation {
                    path: path.clone(),
                    message: format!("{n} は範囲 [{min}, {max}] の外です"),
                });
                None
            }
            Some(_) => Some(value.clone()),
        },
        FieldKind::Pattern { pattern, regex } => match value.as_str() {
            None => {
                errors.push(mismatch(path, "string", value));
                None
            }
            Some(s) if !regex.is_match(s) => {
                errors.push(ValidationError::ConstraintViolation {
                    path: path.clone(),
                    message: format!("\"{s}\" はパターン {pattern} に一致しません"),
                });
                None
            }
            Some(_) => Some(value.clone()),
        },
        FieldKind::Nested(nested) => match value.as_object() {
            None => {
                errors.push(mismatch(path, "block", value));
                None
            }
            Some(object) => {
                let before = errors.len();
                let values = check_object(nested, object, path, errors);
                (errors.len() == before).then_some(Value::Object(values))
            }
        },
        FieldKind::List(inner) => match value.as_array() {
            None => {
                errors.push(mismatch(path, "list", value));
                None
            }
            Some(items) => {
                let before = errors.len();
                let mut checked = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    if let Some(v) = check_value(inner, item, &path.index(i), errors) {
                        checked.push(v);
                    }
                }
                (errors.len() == before).then_some(Value::Array(checked))
            }
        },
        FieldKind::Map(value_kind) => match value.as_object() {
            None => {
                errors.push(mismatch(path, "map", value));
                None
            }
            Some(entries) => {
                let before = errors.len();
                let mut checked = Map::new();
                // 挿入順を保つ（アルファベット順に並べ替えない）
                for (key, entry) in entries {
                    if let Some(v) = check_value(value_kind, entry, &path.child(key), errors) {
                        checked.insert(key.clone(), v);
                    }
                }
                (errors.len() == before).then_some(Value::Object(checked))
            }
        },
    }
}

fn mismatch(path: &FieldPath, expected: &'static str, actual: &Value) -> ValidationError {
    ValidationError::TypeMismatch {
        path: path.clone(),
        expected,
        actual: json_type_name(actual),
    }
}

/// JSON 値の型名（エラーメッセージ用）
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}
