//! スキーマ定義
//!
//! リソース種別ごとの「受け付ける属性の形」を宣言します。スキーマは
//! フィールド仕様の列（宣言順を保持）とクロスフィールド不変条件の列から
//! なり、`SchemaBuilder::build` が定義自体の整合性を検査します。
//!
//! 検証と出力合成は `validate` / `synth` モジュール側の責務で、スキーマは
//! 純粋なデータです。プロバイダカタログは静的スキーマを一度だけ構築して
//! `Arc` で共有します。

mod field;
mod invariant;

pub use field::{FieldKind, FieldSpec};
pub use invariant::{Invariant, InvariantFn};

use std::collections::HashSet;

use crate::error::SchemaError;

/// リソース種別のスキーマ
///
/// フィールドは宣言順に保持され、この順序がバリデーション結果と合成出力の
/// キー順序を決める。
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<FieldSpec>,
    invariants: Vec<Invariant>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder {
            fields: Vec::new(),
            invariants: Vec::new(),
        }
    }

    /// フィールド仕様（宣言順）
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// 名前でフィールド仕様を引く
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// クロスフィールド不変条件
    pub fn invariants(&self) -> &[Invariant] {
        &self.invariants
    }
}

/// スキーマビルダ
///
/// `build` が定義の整合性（名前の重複、必須＋デフォルトの矛盾、空 enum、
/// min > max、未定義フィールドへの不変条件）をまとめて検査する。
/// 定義エラーは入力データの問題ではなくカタログ側のバグなので、静的
/// スキーマの構築では `expect` で即座に落としてよい。
pub struct SchemaBuilder {
    fields: Vec<FieldSpec>,
    invariants: Vec<Invariant>,
}

impl SchemaBuilder {
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn invariant(mut self, invariant: Invariant) -> Self {
        self.invariants.push(invariant);
        self
    }

    pub fn build(self) -> Result<Schema, SchemaError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for spec in &self.fields {
            if !seen.insert(spec.name()) {
                return Err(SchemaError::DuplicateField(spec.name().to_string()));
            }
            if spec.is_required() && !spec.default().is_null() {
                return Err(SchemaError::RequiredWithDefault(spec.name().to_string()));
            }
            check_kind(spec.name(), spec.kind())?;
        }

        for invariant in &self.invariants {
            let involved = invariant.involved_fields();
            if involved.is_empty() {
                return Err(SchemaError::EmptyInvariant);
            }
            for name in involved {
                if !seen.contains(name) {
                    return Err(SchemaError::UnknownInvariantField(name.to_string()));
                }
            }
        }

        Ok(Schema {
            fields: self.fields,
            invariants: self.invariants,
        })
    }
}

/// フィールド型の定義整合性を検査する
///
/// リスト・マップは要素型まで再帰する。ネストスキーマは自身の `build` で
/// 検査済みなので再帰しない。
fn check_kind(field: &str, kind: &FieldKind) -> Result<(), SchemaError> {
    match kind {
        FieldKind::Enum(values) if values.is_empty() => {
            Err(SchemaError::EmptyEnum(field.to_string()))
        }
        FieldKind::IntRange { min, max } if min > max => Err(SchemaError::InvalidBounds {
            field: field.to_string(),
            min: *min,
            max: *max,
        }),
        FieldKind::List(inner) | FieldKind::Map(inner) => check_kind(field, inner),
        _ => Ok(()),
    }
}
