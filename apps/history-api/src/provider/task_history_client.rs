//! # 履歴タスク検索クライアント
//!
//! BPM エンジンの `/history/task` 系エンドポイントを扱う。

use async_trait::async_trait;
use rirekiflow_infra::session::SessionData;

use super::{
   client_impl::{BpmEngineClient, prepare_request},
   error::BpmProviderError,
   response::handle_response,
   types::{CountResultDto, TaskHistoryDto},
};

/// 履歴タスクの検索と件数取得
///
/// 検索系の操作は該当タスクが 1 件もないとき
/// [`BpmProviderError::NoMatchingTasks`] を返す。件数取得は
/// 該当 0 件でも `Ok(0)` を返し、エラーにはしない。
#[async_trait]
pub trait BpmTaskHistoryProvider: Send + Sync {
   /// タスク定義キーとプロセスインスタンス ID で履歴タスクを検索する
   async fn find_tasks_by_definition_key(
      &self,
      task_definition_key: &str,
      process_instance_id: &str,
      user: &SessionData,
      locale: Option<&str>,
   ) -> Result<Vec<TaskHistoryDto>, BpmProviderError>;

   /// プロセスインスタンス ID で履歴タスクを検索する
   async fn find_tasks_by_process_instance(
      &self,
      process_instance_id: &str,
      user: &SessionData,
      locale: Option<&str>,
   ) -> Result<Vec<TaskHistoryDto>, BpmProviderError>;

   /// タスク ID で履歴タスクを検索する
   ///
   /// 同一タスクの履歴は複数エントリになりうるためリストで返す。
   async fn find_tasks_by_task_id(
      &self,
      task_id: &str,
      user: &SessionData,
      locale: Option<&str>,
   ) -> Result<Vec<TaskHistoryDto>, BpmProviderError>;

   /// フィルタ条件に一致する履歴タスクの件数を取得する
   async fn count_history_tasks(
      &self,
      filters: &serde_json::Value,
      user: &SessionData,
      locale: Option<&str>,
   ) -> Result<u64, BpmProviderError>;
}

#[async_trait]
impl BpmTaskHistoryProvider for BpmEngineClient {
   async fn find_tasks_by_definition_key(
      &self,
      task_definition_key: &str,
      process_instance_id: &str,
      user: &SessionData,
      locale: Option<&str>,
   ) -> Result<Vec<TaskHistoryDto>, BpmProviderError> {
      tracing::debug!(
         user_id = %user.user_id(),
         task_definition_key,
         process_instance_id,
         "タスク定義キーで履歴タスクを検索"
      );

      let url = format!(
         "{}/history/task?taskDefinitionKey={}&processInstanceId={}",
         self.base_url,
         urlencoding::encode(task_definition_key),
         urlencoding::encode(process_instance_id),
      );
      let response = prepare_request(self.client.get(&url), locale)
         .send()
         .await?;
      let tasks: Vec<TaskHistoryDto> = handle_response(response, None).await?;

      if tasks.is_empty() {
         return Err(BpmProviderError::NoMatchingTasks);
      }
      Ok(tasks)
   }

   async fn find_tasks_by_process_instance(
      &self,
      process_instance_id: &str,
      user: &SessionData,
      locale: Option<&str>,
   ) -> Result<Vec<TaskHistoryDto>, BpmProviderError> {
      tracing::debug!(
         user_id = %user.user_id(),
         process_instance_id,
         "プロセスインスタンスで履歴タスクを検索"
      );

      let url = format!(
         "{}/history/task?processInstanceId={}",
         self.base_url,
         urlencoding::encode(process_instance_id),
      );
      let response = prepare_request(self.client.get(&url), locale)
         .send()
         .await?;
      let tasks: Vec<TaskHistoryDto> = handle_response(response, None).await?;

      if tasks.is_empty() {
         return Err(BpmProviderError::NoMatchingTasks);
      }
      Ok(tasks)
   }

   async fn find_tasks_by_task_id(
      &self,
      task_id: &str,
      user: &SessionData,
      locale: Option<&str>,
   ) -> Result<Vec<TaskHistoryDto>, BpmProviderError> {
      tracing::debug!(user_id = %user.user_id(), task_id, "タスクIDで履歴タスクを検索");

      let url = format!(
         "{}/history/task?taskId={}",
         self.base_url,
         urlencoding::encode(task_id),
      );
      let response = prepare_request(self.client.get(&url), locale)
         .send()
         .await?;
      let tasks: Vec<TaskHistoryDto> = handle_response(response, None).await?;

      if tasks.is_empty() {
         return Err(BpmProviderError::NoMatchingTasks);
      }
      Ok(tasks)
   }

   async fn count_history_tasks(
      &self,
      filters: &serde_json::Value,
      user: &SessionData,
      locale: Option<&str>,
   ) -> Result<u64, BpmProviderError> {
      tracing::debug!(user_id = %user.user_id(), "履歴タスク件数を取得");

      let url = format!("{}/history/task/count", self.base_url);
      let response = prepare_request(self.client.post(&url), locale)
         .json(filters)
         .send()
         .await?;
      let result: CountResultDto = handle_response(response, None).await?;

      Ok(result.count)
   }
}
