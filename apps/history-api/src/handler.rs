//! # HTTP リクエストハンドラ
//!
//! ルート表（[`crate::app_builder`]）から呼ばれるハンドラ関数をまとめる。
//! サブモジュールごとにハンドラを置き、親モジュールで re-export する。
//! どのハンドラも「検証 → 認証 → 権限ゲート → プロバイダ委譲 → 変換」の順で
//! 処理し、ビジネスロジックはプロバイダ側に寄せる。
//!
//! - [`health`]: liveness / readiness の 2 系統のヘルスチェック
//! - [`task_history`]: 履歴タスクの変数取得・検索・件数取得

pub mod health;
pub mod task_history;

pub use health::{ReadinessState, health_check, readiness_check};
pub use task_history::{
   TaskHistoryState,
   count_task_history,
   find_tasks_by_definition_key,
   find_tasks_by_process_instance,
   find_tasks_by_task_id,
   get_activity_variables,
};
