//! ブロックツリー
//!
//! 検証済み属性から合成されるコンフィグツリーのノードです。フィールド名や
//! 動的ディスパッチではなく、スキーマのフィールド列に駆動される明示的な
//! タグ付きバリアントとして構築します。生の入力から直接組み立てることは
//! できません（`validate` を必ず経由する）。

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::schema::{FieldKind, Schema};
use crate::validate::ValidatedAttributes;

/// 合成されたコンフィグツリーの1ノード
///
/// 直列化は untagged: `Leaf` は値そのもの、`Block` は JSON オブジェクト、
/// `Repeated` はオブジェクトの配列になる。子の順序はスキーマ宣言順
/// （マップ要素は挿入順）で固定され、ハッシュ順に揺れることはない。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Block {
    /// スカラー値またはスカラーのリスト
    Leaf(Value),
    /// 名前付き子ノードの順序付き集合
    Block(IndexMap<String, Block>),
    /// 同じキーで繰り返されるブロックの列
    Repeated(Vec<Block>),
}

impl Block {
    /// 検証済み属性セットからブロックを合成する
    ///
    /// スキーマ宣言順にフィールドを走査する。省略された任意フィールドは
    /// キーごと現れない（null の葉にはならない）。
    pub fn from_validated(attrs: &ValidatedAttributes) -> Self {
        Block::Block(object_children(attrs.schema(), attrs.values()))
    }

    /// 子ノードの集合（`Leaf`/`Repeated` は None）
    pub fn children(&self) -> Option<&IndexMap<String, Block>> {
        match self {
            Block::Block(children) => Some(children),
            _ => None,
        }
    }

    /// 名前で子ノードを引く
    pub fn child(&self, name: &str) -> Option<&Block> {
        self.children().and_then(|children| children.get(name))
    }

    /// 葉の値（`Block`/`Repeated` は None）
    pub fn value(&self) -> Option<&Value> {
        match self {
            Block::Leaf(value) => Some(value),
            _ => None,
        }
    }
}

/// 1階層分の子ノードをスキーマ宣言順で組み立てる
fn object_children(schema: &Schema, values: &Map<String, Value>) -> IndexMap<String, Block> {
    let mut children = IndexMap::new();
    for spec in schema.fields() {
        if let Some(value) = values.get(spec.name()) {
            children.insert(spec.name().to_string(), node_for(spec.kind(), value));
        }
    }
    children
}

/// フィールド型に応じたノードを作る
///
/// 構造を期待する型に文字列が入っているのは検証を通った参照式なので、
/// そのまま葉として埋め込む。
fn node_for(kind: &FieldKind, value: &Value) -> Block {
    match kind {
        FieldKind::Nested(nested) => match value.as_object() {
            Some(object) => Block::Block(object_children(nested, object)),
            None => Block::Leaf(value.clone()),
        },
        FieldKind::List(inner) if matches!(**inner, FieldKind::Nested(_)) => {
            match value.as_array() {
                Some(items) => {
                    Block::Repeated(items.iter().map(|item| node_for(inner, item)).collect())
                }
                None => Block::Leaf(value.clone()),
            }
        }
        FieldKind::Map(value_kind) => match value.as_object() {
            Some(entries) => Block::Block(
                entries
                    .iter()
                    .map(|(key, entry)| (key.clone(), node_for(value_kind, entry)))
                    .collect(),
            ),
            None => Block::Leaf(value.clone()),
        },
        // スカラーとスカラーのリストは値ごと葉になる
        _ => Block::Leaf(value.clone()),
    }
}
