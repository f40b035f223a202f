//! # ユーザー識別子
//!
//! セッションに紐づくユーザーを一意に識別する値オブジェクトを定義する。
//! ユーザーの属性管理（メールアドレス、表示名等）はセッションを発行する
//! 認証基盤の責務であり、このクレートでは識別子のみを扱う。

use derive_more::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ユーザーの一意識別子
///
/// 認証基盤が発行する UUID v7 をそのまま保持する newtype。
/// v7 は時刻順に単調なので、ログに並んだ ID から発行順を追える。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct UserId(Uuid);

impl UserId {
    /// 採番して生成する
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// 既知の UUID を包む
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// 内部の UUID への参照
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}
