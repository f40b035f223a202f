//! # 認可（権限ゲート）
//!
//! BPM エンジンのリソース種別・権限レベルに基づく認可判定を提供する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`ResourceType`] | リソース種別 | BPM エンジンが定義するアクセス制御の対象（タスク、履歴タスク等） |
//! | [`PermissionLevel`] | 権限レベル | リソースに対する操作範囲（自分の分のみ / 全件 / 全権限） |
//! | [`Grant`] | 権限付与 | ユーザーに与えられた (リソース種別, 権限レベル) の組 |
//!
//! ## 設計方針
//!
//! - **ゲートの単純性**: 判定は付与リストの線形走査のみ。外部状態に依存しない純粋関数
//! - **ワイルドカードは ALL のみ**: `READ` と `READ_ALL`
//!   はエンジン上の独立したビットであり、相互に包含しない
//! - **エンジン表記の踏襲**: シリアライズ形式はエンジンの定数表記
//!   （`HISTORIC_TASK`、`READ_ALL` 等）に合わせる
//!
//! ## 使用例
//!
//! ```rust
//! use rirekiflow_domain::authz::{
//!    Grant, PermissionLevel, ResourceType, check_permission,
//! };
//!
//! let grants = vec![
//!    Grant::new(ResourceType::HistoricTask, PermissionLevel::ReadAll),
//! ];
//!
//! let result = check_permission(
//!    &grants,
//!    ResourceType::HistoricTask,
//!    PermissionLevel::ReadAll,
//! );
//! assert!(result.is_ok());
//! ```

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

/// BPM エンジンのリソース種別
///
/// エンジンの認可テーブルが定義するリソースのうち、履歴 API が関与するもの。
/// シリアライズ形式はエンジンの定数表記（例: `HISTORIC_TASK`）に合わせる。
#[derive(
   Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr, strum::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
   /// タスク
   Task,
   /// 履歴タスク
   HistoricTask,
   /// プロセス定義
   ProcessDefinition,
   /// プロセスインスタンス
   ProcessInstance,
   /// フィルタ
   Filter,
}

/// 権限レベル
///
/// リソースに対してユーザーが行える操作の範囲。
#[derive(
   Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr, strum::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PermissionLevel {
   /// 自分に関係する分のみ読み取り可能
   Read,
   /// 全件読み取り可能
   ReadAll,
   /// 全権限（管理者用）
   All,
}

impl PermissionLevel {
   /// この権限レベルが、要求されたレベルを満たすか判定する
   ///
   /// ## マッチングルール
   ///
   /// | 保持レベル | 要求レベル | 結果 |
   /// |----------|----------|------|
   /// | `ALL` | 任意 | true（全権限） |
   /// | `READ_ALL` | `READ_ALL` | true（完全一致） |
   /// | `READ_ALL` | `READ` | false（独立したビット） |
   /// | `READ` | `READ_ALL` | false（独立したビット） |
   pub fn covers(self, required: PermissionLevel) -> bool {
      self == PermissionLevel::All || self == required
   }
}

/// 権限付与（値オブジェクト）
///
/// ユーザーに与えられた (リソース種別, 権限レベル) の組。
/// セッションデータに JSON として保存され、リクエストごとに復元される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
   /// 対象リソース種別
   pub resource: ResourceType,
   /// 付与された権限レベル
   pub level:    PermissionLevel,
}

impl Grant {
   /// 権限付与を作成する
   pub fn new(resource: ResourceType, level: PermissionLevel) -> Self {
      Self { resource, level }
   }

   /// この付与が、要求された (リソース種別, 権限レベル) を満たすか判定する
   ///
   /// リソース種別は完全一致、権限レベルは [`PermissionLevel::covers`] で判定する。
   pub fn satisfies(&self, resource: ResourceType, required: PermissionLevel) -> bool {
      self.resource == resource && self.level.covers(required)
   }
}

/// 権限不足エラー
///
/// [`check_permission`] が拒否した場合に返される。
/// どのリソースにどのレベルが必要だったかを保持し、監査ログに記録できる。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{resource} に対する {required} 権限がありません")]
pub struct PermissionDenied {
   /// 要求されたリソース種別
   pub resource: ResourceType,
   /// 要求された権限レベル
   pub required: PermissionLevel,
}

/// 権限ゲート
///
/// 付与リストの中に要求を満たす [`Grant`] が1つでもあれば許可する。
/// 拒否時は [`PermissionDenied`] を返し、呼び出し元はこの時点で処理を打ち切ること
/// （後続の外部呼び出しを行ってはならない）。
pub fn check_permission(
   grants: &[Grant],
   resource: ResourceType,
   required: PermissionLevel,
) -> Result<(), PermissionDenied> {
   if grants.iter().any(|g| g.satisfies(resource, required)) {
      Ok(())
   } else {
      Err(PermissionDenied { resource, required })
   }
}
