//! # セッションストアのエラー型
//!
//! Redis とのやり取りで発生するエラーを表現する。
//! `std::io::Error` と同じ struct + enum 構成を採り、[`SessionStoreError`] が
//! 種別（[`SessionStoreErrorKind`]）と [`SpanTrace`] を束ねる。
//!
//! `From` 実装・convenience constructor のどちらで生成しても、その時点の
//! スパン経路が `SpanTrace::capture()` で自動記録される。subscriber に
//! `ErrorLayer` が登録されていれば（`init_tracing` が行う）、API 層の
//! エラーログからエラー発生箇所のスパン列を辿れる。

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// セッションストア操作で発生するエラー
///
/// ハンドリングを種別で分けたい場合は [`kind()`](SessionStoreError::kind) で分岐する:
///
/// ```ignore
/// if let SessionStoreErrorKind::Redis(e) = error.kind() {
///     // 接続系の失敗だけを特別扱いする
/// }
/// ```
#[derive(Display)]
#[display("{kind}")]
pub struct SessionStoreError {
    kind:       SessionStoreErrorKind,
    span_trace: SpanTrace,
}

/// [`SessionStoreError`] の種別
///
/// API 層はこの種別を見て HTTP レスポンスへ変換する
/// （いずれも利用者起因ではないため、現状はすべて 500 相当）。
#[derive(Debug, Error)]
pub enum SessionStoreErrorKind {
    /// Redis への接続失敗、コマンド実行エラーなど
    #[error("Redis 操作に失敗しました: {0}")]
    Redis(#[source] redis::RedisError),

    /// セッションデータの JSON 変換失敗
    #[error("JSON 変換に失敗しました: {0}")]
    Serialization(#[source] serde_json::Error),

    /// 上記に分類できないエラー
    #[error("想定外のエラー: {0}")]
    Unexpected(String),
}

impl SessionStoreError {
    /// 種別への参照を返す
    pub fn kind(&self) -> &SessionStoreErrorKind {
        &self.kind
    }

    /// エラー生成時点のスパン経路を取得する
    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// 分類外のエラーをメッセージから生成する
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self {
            kind:       SessionStoreErrorKind::Unexpected(msg.into()),
            span_trace: SpanTrace::capture(),
        }
    }
}

impl fmt::Debug for SessionStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStoreError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for SessionStoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

// ===== 外部エラーからの変換 =====

impl From<redis::RedisError> for SessionStoreError {
    fn from(source: redis::RedisError) -> Self {
        Self {
            kind:       SessionStoreErrorKind::Redis(source),
            span_trace: SpanTrace::capture(),
        }
    }
}

impl From<serde_json::Error> for SessionStoreError {
    fn from(source: serde_json::Error) -> Self {
        Self {
            kind:       SessionStoreErrorKind::Serialization(source),
            span_trace: SpanTrace::capture(),
        }
    }
}
