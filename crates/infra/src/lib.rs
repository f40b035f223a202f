//! # RirekiFlow インフラ層
//!
//! 外部ミドルウェアへの接続を受け持つクレート。現状の接続先は
//! セッションストアの Redis のみで、上位層には [`SessionStore`]
//! トレイト越しに公開する。接続先を差し替えてもドメイン層と API 層の
//! コードが変わらないことをこの境界で保証する。
//!
//! 依存方向は `api → infra → domain` の一方向で、ドメイン層が
//! このクレートを参照することはない。
//!
//! - [`session`] - Redis セッションストア（[`RedisSessionStore`]）
//! - [`error`] - [`SessionStoreError`] と SpanTrace の捕捉
//!
//! ```rust,ignore
//! use rirekiflow_infra::{RedisSessionStore, SessionStore};
//!
//! async fn lookup(session_id: &str) -> Result<(), rirekiflow_infra::SessionStoreError> {
//!     let store = RedisSessionStore::new("redis://localhost").await?;
//!     if let Some(session) = store.get(session_id).await? {
//!         println!("user: {}", session.user_id());
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod session;

pub use error::SessionStoreError;
pub use session::{RedisSessionStore, SessionData, SessionStore};
