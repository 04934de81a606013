//! TerraFlow Registry — 利用可能なリソース定義の台帳
//!
//! どのプロバイダ名前空間にどのリソース定義関数が存在するかを追跡する
//! プロセス内カタログです。宣言・合成の本経路はレジストリを参照しません。
//! 消費するのはカバレッジ集計やドキュメント生成などの外部列挙ツールです。
//!
//! - 登録は和集合への合併で冪等（既存の組は何もしない）
//! - 参照は未登録の名前空間に対して空集合を返す
//! - 実行中に縮むことはない（削除操作を持たない）

pub mod model;

pub use model::Registry;
