//! # History API 設定
//!
//! 環境変数から History API サーバーの設定を読み込む。
//! 必須変数の欠落や不正値は panic ではなく [`ConfigError`] として
//! 呼び出し側（main）へ返す。

use std::env;

use axum::http::HeaderValue;
use thiserror::Error;

/// 設定読み込みの失敗理由
#[derive(Debug, Error)]
pub enum ConfigError {
   /// 必須の環境変数が未設定
   #[error("環境変数 {0} が設定されていません")]
   Missing(&'static str),

   /// 環境変数の値が解釈できない
   #[error("環境変数 {name} の値 {value:?} が不正です: {reason}")]
   Invalid {
      name:   &'static str,
      value:  String,
      reason: String,
   },
}

/// History API サーバーの設定
#[derive(Debug, Clone)]
pub struct HistoryApiConfig {
   /// バインドアドレス
   pub host: String,
   /// ポート番号
   pub port: u16,
   /// Redis 接続 URL
   pub redis_url: String,
   /// BPM エンジンの履歴 REST API ベース URL
   pub bpm_engine_url: String,
   /// サービスルートのベースパス（例: `/services/v1`）
   pub base_path: String,
   /// CORS を許可するフロントエンドのオリジン（未設定なら CORS レイヤーなし）
   pub frontend_origin: Option<HeaderValue>,
   /// 開発用認証バイパス（DevAuth）を使うかどうか
   ///
   /// `DEV_AUTH_ENABLED=true` のときだけ有効。リリースビルドでは
   /// 有効化そのものを拒否する。
   pub dev_auth_enabled: bool,
}

impl HistoryApiConfig {
   /// 環境変数から設定を読み込む
   pub fn from_env() -> Result<Self, ConfigError> {
      let dev_auth_enabled = flag_enabled(env::var("DEV_AUTH_ENABLED").ok().as_deref());

      // 認証バイパスを本番バイナリへ持ち込ませないための最終防壁
      #[cfg(not(debug_assertions))]
      if dev_auth_enabled {
         panic!("リリースビルドで DEV_AUTH_ENABLED=true は受け付けません");
      }

      let port_raw = required("HISTORY_API_PORT")?;
      let port = port_raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
         name:   "HISTORY_API_PORT",
         value:  port_raw.clone(),
         reason: e.to_string(),
      })?;

      Ok(Self {
         host: env::var("HISTORY_API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
         port,
         redis_url: required("REDIS_URL")?,
         bpm_engine_url: required("BPM_ENGINE_URL")?,
         base_path: normalize_base_path(
            &env::var("SERVICES_BASE_PATH").unwrap_or_else(|_| "/services/v1".to_string()),
         ),
         frontend_origin: env::var("FRONTEND_ORIGIN").ok().map(parse_origin).transpose()?,
         dev_auth_enabled,
      })
   }
}

/// 必須の環境変数を読む
fn required(name: &'static str) -> Result<String, ConfigError> {
   env::var(name).map_err(|_| ConfigError::Missing(name))
}

/// `true`（大文字小文字は問わない）だけを有効と解釈するフラグ
fn flag_enabled(raw: Option<&str>) -> bool {
   raw.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// CORS 許可オリジンを `Origin` ヘッダー値として検証する
fn parse_origin(raw: String) -> Result<HeaderValue, ConfigError> {
   raw.parse::<HeaderValue>().map_err(|e| ConfigError::Invalid {
      name:   "FRONTEND_ORIGIN",
      value:  raw,
      reason: e.to_string(),
   })
}

/// ベースパスを `/xxx/yyy` 形式に正規化する
///
/// axum の `nest` は先頭 `/` あり・末尾 `/` なしのパスを要求する。
fn normalize_base_path(raw: &str) -> String {
   let trimmed = raw.trim().trim_end_matches('/');
   if trimmed.is_empty() {
      return "/".to_string();
   }
   if trimmed.starts_with('/') {
      trimmed.to_string()
   } else {
      format!("/{trimmed}")
   }
}
