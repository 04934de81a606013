//! 出力ドキュメント
//!
//! 1回の実行で宣言されたすべてのリソースを `種別 → 名前 → ブロック` の
//! 2段マップで蓄積します。同じ (種別, 名前) は一度しか宣言できず、
//! 二重宣言はドキュメントを変更せずに拒否されます。
//!
//! 所有は単一の呼び出し側に置く想定です（宣言は検査してから挿入する
//! 2段階なので、共有するならミューテックスで直列化すること）。
//! 最終化は外部ツールへの受け渡し（JSON 書き出し）をもって完了とし、
//! 以降の変更は規約上行いません。

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Result, TerraError};

use super::Block;

/// 宣言済みリソースの蓄積先
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Document {
    resources: IndexMap<String, IndexMap<String, Block>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// ブロックを `[type][name]` へ挿入する
    ///
    /// (種別, 名前) が既にあれば `DuplicateDeclaration` で拒否し、
    /// ドキュメントは一切変更しない。
    pub(crate) fn insert(&mut self, resource_type: &str, name: &str, block: Block) -> Result<()> {
        let exists = self
            .resources
            .get(resource_type)
            .is_some_and(|names| names.contains_key(name));
        if exists {
            warn!(%resource_type, %name, "Rejecting duplicate declaration");
            return Err(TerraError::DuplicateDeclaration {
                resource_type: resource_type.to_string(),
                name: name.to_string(),
            });
        }

        self.resources
            .entry(resource_type.to_string())
            .or_default()
            .insert(name.to_string(), block);
        debug!(%resource_type, %name, "Declared resource");
        Ok(())
    }

    /// 宣言済みブロックを引く
    pub fn get(&self, resource_type: &str, name: &str) -> Option<&Block> {
        self.resources.get(resource_type)?.get(name)
    }

    pub fn contains(&self, resource_type: &str, name: &str) -> bool {
        self.get(resource_type, name).is_some()
    }

    /// 宣言済みのリソース種別（宣言順）
    pub fn resource_types(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    /// ある種別の宣言済みリソース名（宣言順）
    pub fn names_of(&self, resource_type: &str) -> impl Iterator<Item = &str> {
        self.resources
            .get(resource_type)
            .into_iter()
            .flat_map(|names| names.keys().map(String::as_str))
    }

    /// 宣言の総数
    pub fn len(&self) -> usize {
        self.resources.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// すべての宣言を破棄して空の状態に戻す
    pub fn clear(&mut self) {
        self.resources.clear();
    }

    /// ドキュメント全体を JSON 文字列へ直列化する
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 外部 apply ツール向けに JSON ファイルとして書き出す
    ///
    /// これが最終化の受け渡し点で、書き出し後のドキュメントは変更しない
    /// 規約とする。
    pub fn write_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut json = self.to_json()?;
        json.push('\n');
        fs::write(path, json)?;
        info!(path = %path.display(), declarations = self.len(), "Wrote document");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn leaf_block(pairs: &[(&str, Value)]) -> Block {
        Block::Block(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), Block::Leaf(v.clone())))
                .collect(),
        )
    }

    #[test]
    fn test_insert_and_get() {
        let mut document = Document::new();
        assert!(document.is_empty());

        document
            .insert("hcloud_volume", "data", leaf_block(&[("size", json!(100))]))
            .unwrap();

        assert!(document.contains("hcloud_volume", "data"));
        assert!(!document.contains("hcloud_volume", "other"));
        assert_eq!(document.len(), 1);
    }

    #[test]
    fn test_duplicate_leaves_document_unchanged() {
        let mut document = Document::new();
        document
            .insert("hcloud_volume", "data", leaf_block(&[("size", json!(100))]))
            .unwrap();

        let error = document
            .insert("hcloud_volume", "data", leaf_block(&[("size", json!(999))]))
            .unwrap_err();
        assert!(matches!(
            error,
            TerraError::DuplicateDeclaration { ref resource_type, ref name }
                if resource_type == "hcloud_volume" && name == "data"
        ));

        // 最初の宣言のブロックがそのまま残る
        let block = document.get("hcloud_volume", "data").unwrap();
        assert_eq!(block.child("size").unwrap().value(), Some(&json!(100)));
        assert_eq!(document.len(), 1);
    }

    #[test]
    fn test_same_name_different_type_is_allowed() {
        let mut document = Document::new();
        document
            .insert("hcloud_volume", "data", leaf_block(&[("size", json!(10))]))
            .unwrap();
        document
            .insert("hcloud_server", "data", leaf_block(&[("name", json!("data"))]))
            .unwrap();

        assert_eq!(document.len(), 2);
        assert_eq!(
            document.resource_types().collect::<Vec<_>>(),
            vec!["hcloud_volume", "hcloud_server"]
        );
        assert_eq!(document.names_of("hcloud_volume").collect::<Vec<_>>(), vec!["data"]);
        assert_eq!(document.names_of("hcloud_network").count(), 0);

        document.clear();
        assert!(document.is_empty());
        assert_eq!(document.len(), 0);
    }

    #[test]
    fn test_serialized_shape() {
        let mut document = Document::new();
        document
            .insert(
                "hcloud_volume",
                "data",
                leaf_block(&[("name", json!("web-data")), ("size", json!(100))]),
            )
            .unwrap();

        assert_eq!(
            serde_json::to_value(&document).unwrap(),
            json!({"hcloud_volume": {"data": {"name": "web-data", "size": 100}}})
        );
    }

    #[test]
    fn test_empty_document_serializes_to_empty_object() {
        let document = Document::new();
        assert_eq!(document.to_json().unwrap(), "{}");
    }

    #[test]
    fn test_write_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("infra.tf.json");

        let mut document = Document::new();
        document
            .insert("hcloud_volume", "data", leaf_block(&[("size", json!(100))]))
            .unwrap();
        document.write_json_file(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.ends_with('\n'));
        let parsed: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(
            parsed,
            json!({"hcloud_volume": {"data": {"size": 100}}})
        );
    }
}
