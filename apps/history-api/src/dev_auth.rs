//! # 開発用認証バイパス（DevAuth）
//!
//! 認証基盤の接続先がない環境でも履歴 API を叩けるよう、
//! 起動時に既知のセッションを Redis へ仕込む開発専用の仕組み。
//! `DEV_AUTH_ENABLED=true` で起動し、クライアント側は Cookie
//! `session_id=dev-session-id` を送るだけで認証済みとして扱われる。
//!
//! 本番への流出は三重に防ぐ:
//!
//! - 環境変数が `true` でなければ何もしない
//! - `dev-auth` フィーチャを外したビルドではこのモジュール自体が存在しない
//! - リリースビルドでは設定ガードが起動を拒否する

use rirekiflow_domain::{
   authz::{Grant, PermissionLevel, ResourceType},
   user::UserId,
};
use rirekiflow_infra::{SessionData, SessionStore};
use uuid::Uuid;

/// 開発用ユーザーの固定 ID。ログ上で開発セッションを見分けるための値
pub const DEV_USER_ID: Uuid = Uuid::from_u128(0x00000000_0000_0000_0000_0000_0000_00d1);

/// クライアントが Cookie `session_id` に設定する固定のセッション ID
pub const DEV_SESSION_ID: &str = "dev-session-id";

/// 開発用ユーザーのメールアドレス
pub const DEV_USER_EMAIL: &str = "dev@rirekiflow.example.com";

/// 開発用ユーザーの表示名
pub const DEV_USER_NAME: &str = "開発ユーザー";

/// 開発用ユーザーに付与する権限
///
/// 全リソース種別に対する `READ_ALL`。履歴 API の全エンドポイントを
/// 権限ゲートで拒否されずに呼び出せる。
fn dev_user_grants() -> Vec<Grant> {
   [
      ResourceType::Task,
      ResourceType::HistoricTask,
      ResourceType::ProcessDefinition,
      ResourceType::ProcessInstance,
      ResourceType::Filter,
   ]
   .into_iter()
   .map(|resource| Grant::new(resource, PermissionLevel::ReadAll))
   .collect()
}

/// 開発用セッションを Redis に作成する
///
/// 起動のたびに呼ばれ、同じ [`DEV_SESSION_ID`] で作り直す。
pub async fn setup_dev_session<S: SessionStore>(session_store: &S) -> anyhow::Result<()> {
   let session_data = SessionData::new(
      UserId::from_uuid(DEV_USER_ID),
      DEV_USER_EMAIL.to_string(),
      DEV_USER_NAME.to_string(),
      dev_user_grants(),
   );

   // 前回起動分が残っていても同じ ID で作り直せるよう、先に消す
   let _ = session_store.delete(DEV_SESSION_ID).await;

   session_store
      .create_with_id(DEV_SESSION_ID, &session_data)
      .await?;

   Ok(())
}
