//! # RirekiFlow 共有ユーティリティ
//!
//! レイヤーを問わず使い回す型と基盤コードを集めたクレート。
//! ビジネスロジックは置かず、他クレートから一方的に依存される。
//!
//! - [`error_response`] - RFC 9457 準拠のエラーボディ
//! - [`health`] - ヘルスチェックのレスポンス型
//! - [`observability`] - tracing 初期化とリクエスト ID の基盤
//! - `canonical_log` - リクエスト完了サマリの tower Layer
//!   （`observability` フィーチャで有効化）
//!
//! OpenAPI スキーマ導出は `openapi` フィーチャでオプトインする。

#[cfg(feature = "observability")]
pub mod canonical_log;
pub mod error_response;
pub mod health;
pub mod observability;

pub use error_response::ErrorResponse;
pub use health::{CheckStatus, HealthResponse, ReadinessChecks, ReadinessResponse, ReadinessStatus};
