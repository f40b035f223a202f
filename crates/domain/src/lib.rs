//! # RirekiFlow ドメイン層
//!
//! BPM エンジンの履歴 API を扱う上での中核概念を定義する。
//! 提供するのは認可モデル（リソース種別・権限レベル・権限ゲート
//! [`authz::check_permission`]）とユーザー識別子で、Redis や HTTP と
//! いったインフラには依存しない。依存方向は `api → infra → domain`。
//!
//! ```rust
//! use rirekiflow_domain::authz::{
//!     Grant, PermissionLevel, ResourceType, check_permission,
//! };
//!
//! let grants = vec![Grant::new(ResourceType::Task, PermissionLevel::ReadAll)];
//!
//! assert!(check_permission(&grants, ResourceType::Task, PermissionLevel::ReadAll).is_ok());
//! assert!(check_permission(&grants, ResourceType::HistoricTask, PermissionLevel::ReadAll).is_err());
//! ```

pub mod authz;
pub mod user;

pub use authz::PermissionDenied;
