//! ブロック合成
//!
//! 検証済み属性からブロックツリーを組み立て、ドキュメントへ登録して
//! 出力参照を返します。リソース定義関数（プロバイダカタログ側）は
//! `declare` を1回呼ぶだけで validate → synthesize の列が完結します。

mod block;
mod document;

pub use block::Block;
pub use document::Document;

use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::reference::Reference;
use crate::schema::Schema;
use crate::validate::{validate, ValidatedAttributes};

/// 検証済み属性をブロックへ合成してドキュメントに登録する
///
/// (種別, 名前) が既に宣言済みなら `DuplicateDeclaration` でドキュメントを
/// 変更せずに失敗する。成功時は静的な `output_names` をすべて公開する
/// 参照を返す。
///
/// 同じ検証済み属性からは常に同一のブロックツリーが合成される
/// （順序はスキーマ宣言順で固定）。
pub fn synthesize(
    document: &mut Document,
    resource_type: &str,
    name: &str,
    attrs: &ValidatedAttributes,
    output_names: &[&str],
) -> Result<Reference> {
    let block = Block::from_validated(attrs);
    document.insert(resource_type, name, block)?;
    Ok(Reference::new(resource_type, name, output_names, attrs.clone()))
}

/// 生属性の検証と合成を1回で行う
///
/// プロバイダカタログのリソース定義関数はこれを呼ぶ。バリデーション
/// 失敗時はエラー全件を返し、ドキュメントには何も登録しない。
pub fn declare(
    document: &mut Document,
    resource_type: &str,
    name: &str,
    schema: &Arc<Schema>,
    attrs: &Value,
    output_names: &[&str],
) -> Result<Reference> {
    let validated = validate(schema, attrs)?;
    synthesize(document, resource_type, name, &validated, output_names)
}
