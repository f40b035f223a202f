//! BPM エンジン履歴 API の DTO
//!
//! エンジンが返す形をそのまま写した型。ディスパッチャは変換を行わず、
//! プロバイダの結果をこの形のまま呼び出し元へ返す。
//! タイムスタンプはエンジンの表記を保持するため文字列のまま扱う。

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 履歴タスク DTO
///
/// 完了後も保持されるタスクインスタンスの記録。
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskHistoryDto {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub assignee: Option<String>,
    pub owner: Option<String>,
    pub priority: Option<i32>,
    pub task_definition_key: Option<String>,
    pub process_definition_key: Option<String>,
    pub process_definition_id: Option<String>,
    pub process_instance_id: Option<String>,
    pub execution_id: Option<String>,
    pub activity_instance_id: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub duration: Option<i64>,
    pub due: Option<String>,
    pub delete_reason: Option<String>,
    pub tenant_id: Option<String>,
}

/// 変数履歴 DTO
///
/// プロセス実行中の各時点で記録された変数値。完了後も保持される。
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VariableHistoryDto {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: Option<String>,
    pub value: Option<serde_json::Value>,
    pub process_definition_key: Option<String>,
    pub process_definition_id: Option<String>,
    pub process_instance_id: Option<String>,
    pub execution_id: Option<String>,
    pub activity_instance_id: Option<String>,
    pub task_id: Option<String>,
    pub state: Option<String>,
    pub error_message: Option<String>,
    pub create_time: Option<String>,
    pub removal_time: Option<String>,
    pub tenant_id: Option<String>,
}

/// 件数レスポンス
///
/// エンジンの `POST /history/task/count` は `{"count": N}` を返す。
#[derive(Debug, Clone, Deserialize)]
pub(super) struct CountResultDto {
    pub count: u64,
}
