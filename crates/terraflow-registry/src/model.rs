//! レジストリデータモデル

use indexmap::{IndexMap, IndexSet};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

static EMPTY: Lazy<IndexSet<String>> = Lazy::new(IndexSet::new);

/// 名前空間 → リソース定義関数名の集合
///
/// プロバイダカタログのロード時に加算的に埋められ、実行中に縮むことは
/// ない。グローバル状態ではなく所有者が明示的にライフサイクルを管理する
/// 値で、プロセス開始時に構築して必要なモジュールへ参照で渡す。
/// 複数スレッドで共有する場合は `register` を呼び出し側で直列化すること
/// （登録は確認してから挿入する2段階で、それ自体はアトミックではない）。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    /// 名前空間のマップ（登録順を保持）
    namespaces: IndexMap<String, IndexSet<String>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 定義名の集合を名前空間へ合併する
    ///
    /// 既に存在する (名前空間, 定義名) の組は黙って無視される（冪等）。
    pub fn register<I, S>(&mut self, namespace: impl Into<String>, definitions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let namespace = namespace.into();
        let entry = self.namespaces.entry(namespace.clone()).or_default();
        let mut added = 0usize;
        for definition in definitions {
            if entry.insert(definition.into()) {
                added += 1;
            }
        }
        debug!(%namespace, added, total = entry.len(), "Registered definitions");
    }

    /// 名前空間の定義名集合を引く（未登録なら空集合）
    pub fn lookup(&self, namespace: &str) -> &IndexSet<String> {
        self.namespaces.get(namespace).unwrap_or(&EMPTY)
    }

    /// (名前空間, 定義名) が登録済みかどうか
    pub fn contains(&self, namespace: &str, definition: &str) -> bool {
        self.lookup(namespace).contains(definition)
    }

    /// 登録済みの名前空間（登録順）
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.namespaces.keys().map(String::as_str)
    }

    /// 全名前空間の定義数の合計
    pub fn definition_count(&self) -> usize {
        self.namespaces.values().map(IndexSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}
