//! # BPM エンジン履歴プロバイダ
//!
//! ディスパッチャが委譲する履歴データ取得の抽象（プロバイダトレイト）と、
//! BPM エンジンの履歴 REST API を呼び出す実装を提供する。
//!
//! ## エンドポイント
//!
//! - `GET /history/activity-instance/{id}` - アクティビティインスタンスの存在確認
//! - `GET /history/variable-instance` - 変数履歴の取得
//! - `GET /history/task` - 履歴タスクの検索
//! - `POST /history/task/count` - 履歴タスクの件数取得

mod client_impl;
mod error;
mod response;
mod task_history_client;
mod types;
mod variable_client;

pub use client_impl::{BpmEngineClient, BpmHistoryProvider};
pub use error::BpmProviderError;
pub use task_history_client::BpmTaskHistoryProvider;
pub use types::{TaskHistoryDto, VariableHistoryDto};
pub use variable_client::BpmVariableProvider;
