//! # RFC 9457 Problem Details 形式のエラーボディ
//!
//! 履歴 API が返す統一エラーボディ。`type` / `title` / `status` / `detail` の
//! 4 フィールド構成で、`type` は URI により問題種別を機械判別可能にする。
//!
//! shared 側は純粋なデータ構造（`Serialize` / `Deserialize`）に留め、
//! axum の `IntoResponse` 変換はアプリケーション層が担う。
//! エラー分類ごとの便利コンストラクタで URI のハードコードを避け、
//! 操作固有の 404（アクティビティインスタンス不在など）は `new()` で
//! サフィックスを指定して組み立てる。

use serde::{Deserialize, Serialize};

/// `type` フィールドの URI に共通する前半部
const ERROR_TYPE_BASE: &str = "https://rirekiflow.example.com/errors";

/// API が返す統一エラーボディ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
   #[serde(rename = "type")]
   pub error_type: String,
   pub title:      String,
   pub status:     u16,
   pub detail:     String,
}

impl ErrorResponse {
   /// 任意の種別・ステータスで組み立てる
   ///
   /// `error_type_suffix` はベース URI の末尾に付加される
   /// （例: `"activity-instance-not-found"`）。操作固有のエラー種別は
   /// こちらで組み立てる。
   pub fn new(
      error_type_suffix: &str,
      title: impl Into<String>,
      status: u16,
      detail: impl Into<String>,
   ) -> Self {
      Self {
         error_type: format!("{ERROR_TYPE_BASE}/{error_type_suffix}"),
         title: title.into(),
         status,
         detail: detail.into(),
      }
   }

   /// 400 Validation Error（入力不備）
   pub fn validation_error(detail: impl Into<String>) -> Self {
      Self::new("validation-error", "Validation Error", 400, detail)
   }

   /// 401 Unauthorized（識別情報なし）
   pub fn unauthorized(detail: impl Into<String>) -> Self {
      Self::new("unauthorized", "Unauthorized", 401, detail)
   }

   /// 403 Forbidden（権限ゲート拒否）
   pub fn forbidden(detail: impl Into<String>) -> Self {
      Self::new("forbidden", "Forbidden", 403, detail)
   }

   /// 500 Internal Server Error
   ///
   /// detail は固定文言。通信失敗やエンジンの想定外応答の内容を
   /// クライアントへ漏らさない。
   pub fn internal_error() -> Self {
      Self::new(
         "internal-error",
         "Internal Server Error",
         500,
         "内部エラーが発生しました",
      )
   }
}
