//! クロスフィールド不変条件
//!
//! 個々のフィールド検証がすべて成功した後に、候補属性セット全体へ適用
//! される述語です。1つのスキーマに複数登録でき、違反はそれぞれ独立した
//! エラーとして収集されます（最初の違反で打ち切らない）。

use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::validate::FieldPath;

/// 候補属性マップへの任意の述語
///
/// クロージャではなく fn ポインタにしておくことで `Invariant` の
/// `Debug`/`Clone` を保つ。true なら条件を満たす。
pub type InvariantFn = fn(&Map<String, Value>) -> bool;

/// スキーマ横断の不変条件
#[derive(Debug, Clone)]
pub enum Invariant {
    /// 同時に指定できないフィールドの組
    MutuallyExclusive(Vec<String>),
    /// ちょうど1つだけ指定しなければならないフィールドの組
    ExactlyOneOf(Vec<String>),
    /// 少なくとも1つは指定しなければならないフィールドの組
    AtLeastOneOf(Vec<String>),
    /// `field` を指定する場合は `requires` も必須
    RequiredWith { field: String, requires: String },
    /// リストフィールドの要素がすべて一意であること
    UniqueItems(String),
    /// 任意の述語（「割合の合計が100」のような数値条件に使う）
    Custom {
        /// 違反時のメッセージ
        name: String,
        /// 関与するフィールド名
        involved: Vec<String>,
        check: InvariantFn,
    },
}

impl Invariant {
    pub fn mutually_exclusive<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invariant::MutuallyExclusive(fields.into_iter().map(Into::into).collect())
    }

    pub fn exactly_one_of<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invariant::ExactlyOneOf(fields.into_iter().map(Into::into).collect())
    }

    pub fn at_least_one_of<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invariant::AtLeastOneOf(fields.into_iter().map(Into::into).collect())
    }

    pub fn required_with(field: impl Into<String>, requires: impl Into<String>) -> Self {
        Invariant::RequiredWith {
            field: field.into(),
            requires: requires.into(),
        }
    }

    pub fn unique_items(field: impl Into<String>) -> Self {
        Invariant::UniqueItems(field.into())
    }

    pub fn custom<I, S>(name: impl Into<String>, involved: I, check: InvariantFn) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invariant::Custom {
            name: name.into(),
            involved: involved.into_iter().map(Into::into).collect(),
            check,
        }
    }

    /// この不変条件が参照するフィールド名
    pub fn involved_fields(&self) -> Vec<&str> {
        match self {
            Invariant::MutuallyExclusive(fields)
            | Invariant::ExactlyOneOf(fields)
            | Invariant::AtLeastOneOf(fields) => fields.iter().map(String::as_str).collect(),
            Invariant::RequiredWith { field, requires } => vec![field, requires],
            Invariant::UniqueItems(field) => vec![field],
            Invariant::Custom { involved, .. } => involved.iter().map(String::as_str).collect(),
        }
    }

    /// 候補属性マップに対して条件を評価する
    ///
    /// `base` はネストしたスキーマ内で評価されるときの起点パスで、
    /// 違反エラーのフィールド名を修飾するためだけに使う。
    pub(crate) fn check(
        &self,
        attrs: &Map<String, Value>,
        base: &FieldPath,
    ) -> Result<(), ValidationError> {
        match self {
            Invariant::MutuallyExclusive(fields) => {
                let present: Vec<&String> =
                    fields.iter().filter(|f| attrs.contains_key(*f)).collect();
                if present.len() > 1 {
                    return Err(violation(
                        base,
                        &present.iter().map(|f| f.as_str()).collect::<Vec<_>>(),
                        "同時に指定できません".to_string(),
                    ));
                }
                Ok(())
            }
            Invariant::ExactlyOneOf(fields) => {
                let count = fields.iter().filter(|f| attrs.contains_key(*f)).count();
                if count != 1 {
                    return Err(violation(
                        base,
                        &self.involved_fields(),
                        format!("ちょうど1つだけ指定してください (現在 {count} 件)"),
                    ));
                }
                Ok(())
            }
            Invariant::AtLeastOneOf(fields) => {
                if !fields.iter().any(|f| attrs.contains_key(f)) {
                    return Err(violation(
                        base,
                        &self.involved_fields(),
                        "少なくとも1つは指定してください".to_string(),
                    ));
                }
                Ok(())
            }
            Invariant::RequiredWith { field, requires } => {
                if attrs.contains_key(field) && !attrs.contains_key(requires) {
                    return Err(violation(
                        base,
                        &self.involved_fields(),
                        format!("{field} を指定する場合は {requires} も必須です"),
                    ));
                }
                Ok(())
            }
            Invariant::UniqueItems(field) => {
                if let Some(Value::Array(items)) = attrs.get(field) {
                    if let Some(dup) = first_duplicate(items) {
                        return Err(violation(
                            base,
                            &[field],
                            format!("重複する値があります: {dup}"),
                        ));
                    }
                }
                Ok(())
            }
            Invariant::Custom {
                name,
                involved,
                check,
            } => {
                if !check(attrs) {
                    return Err(violation(
                        base,
                        &involved.iter().map(String::as_str).collect::<Vec<_>>(),
                        name.clone(),
                    ));
                }
                Ok(())
            }
        }
    }
}

fn violation(base: &FieldPath, fields: &[&str], message: String) -> ValidationError {
    ValidationError::CrossFieldInvariant {
        fields: fields.iter().map(|f| base.child(*f).to_string()).collect(),
        message,
    }
}

/// リスト内で最初に見つかった重複値
fn first_duplicate(items: &[Value]) -> Option<&Value> {
    for (i, item) in items.iter().enumerate() {
        if items[..i].contains(item) {
            return Some(item);
        }
    }
    None
}
