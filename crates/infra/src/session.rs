//! # セッションストア
//!
//! Redis 上のセッションを読み書きする。キーは `session:{session_id}`、
//! 値は [`SessionData`] の JSON、TTL は 28800 秒（8時間）。
//!
//! セッションは認証基盤がログイン成功時に作成し、この API は参照のみを行う。
//! 開発用の固定セッション（dev-auth）のために `create_with_id` も提供する。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::{AsyncCommands, aio::ConnectionManager};
use rirekiflow_domain::{authz::Grant, user::UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::SessionStoreError;

/// セッションの有効期限。8時間で失効する
const SESSION_TTL_SECONDS: u64 = 28800;

/// Redis に保存されるセッションの内容
///
/// JSON にシリアライズして保存される。ログイン成功時に認証基盤が書き込み、
/// ログアウトまたは TTL 経過で消える。`grants` はユーザーに付与された
/// BPM エンジン上の権限で、履歴 API の権限ゲートはこのリストに対して
/// 判定を行う。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
   user_id: UserId,
   email: String,
   name: String,
   grants: Vec<Grant>,
   created_at: DateTime<Utc>,
   last_accessed_at: DateTime<Utc>,
}

impl SessionData {
   /// セッションデータを作成する（時刻フィールドは現在時刻で初期化）
   pub fn new(user_id: UserId, email: String, name: String, grants: Vec<Grant>) -> Self {
      let now = Utc::now();
      Self {
         user_id,
         email,
         name,
         grants,
         created_at: now,
         last_accessed_at: now,
      }
   }

   pub fn user_id(&self) -> &UserId {
      &self.user_id
   }

   pub fn email(&self) -> &str {
      &self.email
   }

   pub fn name(&self) -> &str {
      &self.name
   }

   pub fn grants(&self) -> &[Grant] {
      &self.grants
   }

   pub fn created_at(&self) -> DateTime<Utc> {
      self.created_at
   }

   pub fn last_accessed_at(&self) -> DateTime<Utc> {
      self.last_accessed_at
   }
}

/// セッションストアの操作トレイト
///
/// 本番実装は [`RedisSessionStore`]。ハンドラのテストではスタブ実装に
/// 差し替える。
#[async_trait]
pub trait SessionStore: Send + Sync {
   /// セッションを作成し、生成したセッション ID（UUID v4）を返す
   async fn create(&self, data: &SessionData) -> Result<String, SessionStoreError>;

   /// 指定したセッション ID でセッションを作成する
   ///
   /// 開発用の固定セッション（dev-auth）で使用する。
   /// 既存の同一 ID のセッションは上書きされる。
   async fn create_with_id(
      &self,
      session_id: &str,
      data: &SessionData,
   ) -> Result<(), SessionStoreError>;

   /// セッションを取得する。存在しなければ `None`
   async fn get(&self, session_id: &str) -> Result<Option<SessionData>, SessionStoreError>;

   /// セッションを削除する。存在しないセッション ID も成功扱い
   async fn delete(&self, session_id: &str) -> Result<(), SessionStoreError>;

   /// セッションの残り TTL（秒）を返す。キーがなければ `None`
   async fn get_ttl(&self, session_id: &str) -> Result<Option<i64>, SessionStoreError>;
}

/// [`SessionStore`] の Redis 実装
pub struct RedisSessionStore {
   conn: ConnectionManager,
}

impl RedisSessionStore {
   /// Redis 接続 URL（例: `redis://localhost:6379`）から作成する
   pub async fn new(redis_url: &str) -> Result<Self, SessionStoreError> {
      let client = redis::Client::open(redis_url)?;
      let conn = ConnectionManager::new(client).await?;
      Ok(Self { conn })
   }

   /// Readiness Check 用に内部の接続マネージャを複製する
   ///
   /// ConnectionManager はコマンド送信時に `&mut` を要求するが、
   /// clone はチャネルの複製のみで接続自体は共有される。
   pub fn connection(&self) -> ConnectionManager {
      self.conn.clone()
   }

   /// セッションキーを生成する
   fn session_key(session_id: &str) -> String {
      format!("session:{session_id}")
   }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
   async fn create(&self, data: &SessionData) -> Result<String, SessionStoreError> {
      // セッション ID は推測不能である必要があるため v4 を使う
      let session_id = Uuid::new_v4().to_string();
      self.create_with_id(&session_id, data).await?;
      Ok(session_id)
   }

   async fn create_with_id(
      &self,
      session_id: &str,
      data: &SessionData,
   ) -> Result<(), SessionStoreError> {
      let key = Self::session_key(session_id);
      let json = serde_json::to_string(data)?;

      let mut conn = self.conn.clone();
      let _: () = conn.set_ex(&key, json, SESSION_TTL_SECONDS).await?;

      Ok(())
   }

   async fn get(&self, session_id: &str) -> Result<Option<SessionData>, SessionStoreError> {
      let key = Self::session_key(session_id);
      let mut conn = self.conn.clone();

      let Some(json) = conn.get::<_, Option<String>>(&key).await? else {
         return Ok(None);
      };
      Ok(Some(serde_json::from_str(&json)?))
   }

   async fn delete(&self, session_id: &str) -> Result<(), SessionStoreError> {
      let key = Self::session_key(session_id);
      let mut conn = self.conn.clone();
      let _: () = conn.del(&key).await?;
      Ok(())
   }

   async fn get_ttl(&self, session_id: &str) -> Result<Option<i64>, SessionStoreError> {
      let key = Self::session_key(session_id);
      let mut conn = self.conn.clone();

      let ttl: i64 = conn.ttl(&key).await?;

      // Redis の TTL は「キーなし」を -2、「期限なし」を -1 で表す
      if ttl < 0 { Ok(None) } else { Ok(Some(ttl)) }
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use rirekiflow_domain::authz::{PermissionLevel, ResourceType};

   use super::*;

   #[test]
   fn test_セッションキーの形式が正しい() {
      assert_eq!(
         RedisSessionStore::session_key("abc-123"),
         "session:abc-123"
      );
   }

   #[test]
   fn test_セッションデータのjson形式にgrantsが含まれる() {
      let data = SessionData::new(
         UserId::new(),
         "demo@example.com".to_string(),
         "Demo User".to_string(),
         vec![Grant::new(ResourceType::Task, PermissionLevel::ReadAll)],
      );

      let json = serde_json::to_value(&data).unwrap();

      assert_eq!(json["email"], "demo@example.com");
      assert_eq!(json["grants"][0]["resource"], "TASK");
      assert_eq!(json["grants"][0]["level"], "READ_ALL");
   }

   #[test]
   fn test_セッションデータをjsonから復元できる() {
      let original = SessionData::new(
         UserId::new(),
         "demo@example.com".to_string(),
         "Demo User".to_string(),
         vec![Grant::new(
            ResourceType::HistoricTask,
            PermissionLevel::ReadAll,
         )],
      );

      let json = serde_json::to_string(&original).unwrap();
      let restored: SessionData = serde_json::from_str(&json).unwrap();

      assert_eq!(restored.user_id(), original.user_id());
      assert_eq!(restored.grants(), original.grants());
   }
}
