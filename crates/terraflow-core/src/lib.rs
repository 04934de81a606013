//! TerraFlow コア — スキーマ検証とコンフィグツリー合成
//!
//! インフラリソースをコードで宣言し、外部のプロビジョニングツールが
//! 消費できる構造化ドキュメントとして出力するためのエンジンです。
//! プロバイダカタログ（terraflow-hcloud など）はこのコアの契約を
//! リソース種別ごとに繰り返すだけで、設計上の本体はここにあります。
//!
//! # 処理の流れ
//!
//! ```text
//! スキーマ定義 (種別ごとに1回)
//!      │
//! 生属性マップ ──▶ validate ──▶ 検証済み属性 ──▶ synthesize ──▶ Document
//!                    │                              │              │
//!                    ▼                              ▼              ▼
//!              エラー全件リスト                 Reference      JSON 書き出し
//!                                         (${type.name.attr})
//! ```
//!
//! - バリデーションは純粋関数で、独立したフィールドのエラーを全件収集する
//! - 合成はスキーマ宣言順で決定的（ハッシュ順に揺れない）
//! - 参照は解決しないシンボリック式で、後続の宣言の生属性にそのまま渡せる
//! - ネットワークにも認証にも触れない。形の検証とツリーの組み立てだけを行う

pub mod error;
pub mod reference;
pub mod schema;
pub mod synth;
pub mod validate;

// Re-exports
pub use error::{Result, SchemaError, TerraError, ValidationError, ValidationErrors};
pub use reference::{expression, is_expression, Reference};
pub use schema::{FieldKind, FieldSpec, Invariant, InvariantFn, Schema, SchemaBuilder};
pub use synth::{declare, synthesize, Block, Document};
pub use validate::{validate, FieldPath, ValidatedAttributes};
