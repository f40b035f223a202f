//! BPM エンジンプロバイダのエラー型

use thiserror::Error;

/// エンジン問い合わせの失敗理由
///
/// 404 系は操作ごとに専用バリアントへ対応付け、API 層でタイプ URI の
/// 異なる 404 レスポンスに変換する。それ以外はすべて 500 相当。
#[derive(Debug, Clone, Error)]
pub enum BpmProviderError {
   /// アクティビティインスタンスが見つからない（404）
   #[error("アクティビティインスタンスが見つかりません: {0}")]
   ActivityInstanceNotFound(String),

   /// 条件に合致する履歴タスクが存在しない（404）
   #[error("該当する履歴タスクが見つかりません")]
   NoMatchingTasks,

   /// エンジンに到達できない、または応答ボディが読めない
   #[error("エンジンとの通信に失敗しました: {0}")]
   Network(String),

   /// 対応付けのないステータスやボディ形式
   #[error("エンジンからの想定外の応答: {0}")]
   Unexpected(String),
}

impl From<reqwest::Error> for BpmProviderError {
   fn from(err: reqwest::Error) -> Self {
      BpmProviderError::Network(err.to_string())
   }
}
