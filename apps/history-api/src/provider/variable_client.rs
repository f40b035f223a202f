//! # 履歴変数取得クライアント
//!
//! BPM エンジンの履歴変数エンドポイントを扱う。

use async_trait::async_trait;
use rirekiflow_infra::session::SessionData;

use super::{
   client_impl::{BpmEngineClient, prepare_request},
   error::BpmProviderError,
   response::{ensure_found, handle_response},
   types::VariableHistoryDto,
};

/// アクティビティインスタンスに紐づく履歴変数の取得
#[async_trait]
pub trait BpmVariableProvider: Send + Sync {
   /// アクティビティインスタンスの履歴変数を取得する
   ///
   /// アクティビティインスタンス自体が存在しないときは
   /// [`BpmProviderError::ActivityInstanceNotFound`] を返す。
   /// 存在するが変数がないときは空リストを返す。
   async fn fetch_activity_variables_history(
      &self,
      activity_instance_id: &str,
      user: &SessionData,
      locale: Option<&str>,
   ) -> Result<Vec<VariableHistoryDto>, BpmProviderError>;
}

#[async_trait]
impl BpmVariableProvider for BpmEngineClient {
   async fn fetch_activity_variables_history(
      &self,
      activity_instance_id: &str,
      user: &SessionData,
      locale: Option<&str>,
   ) -> Result<Vec<VariableHistoryDto>, BpmProviderError> {
      tracing::debug!(
         user_id = %user.user_id(),
         activity_instance_id,
         "アクティビティインスタンスの履歴変数を取得"
      );

      // 変数 0 件と対象不存在を区別するため、先に存在確認を行う
      let url = format!(
         "{}/history/activity-instance/{}",
         self.base_url,
         urlencoding::encode(activity_instance_id),
      );
      let response = prepare_request(self.client.get(&url), locale)
         .send()
         .await?;
      ensure_found(
         response,
         BpmProviderError::ActivityInstanceNotFound(activity_instance_id.to_string()),
      )
      .await?;

      let url = format!(
         "{}/history/variable-instance?activityInstanceIdIn={}",
         self.base_url,
         urlencoding::encode(activity_instance_id),
      );
      let response = prepare_request(self.client.get(&url), locale)
         .send()
         .await?;
      handle_response(response, None).await
   }
}
