//! # BPM エンジンクライアント実装
//!
//! BPM エンジンの履歴 REST API への HTTP クライアント。
//! 各操作の実装は concern ごとのサブトレイト
//! ([`BpmTaskHistoryProvider`]、[`BpmVariableProvider`]) に分割し、
//! このモジュールではクライアント本体と統合トレイトを定義する。

use crate::middleware::request_id::inject_request_id;

use super::{task_history_client::BpmTaskHistoryProvider, variable_client::BpmVariableProvider};

/// BPM エンジンへの HTTP クライアント
#[derive(Debug, Clone)]
pub struct BpmEngineClient {
   pub(super) base_url: String,
   pub(super) client:   reqwest::Client,
}

impl BpmEngineClient {
   pub fn new(base_url: &str) -> Self {
      Self {
         base_url: base_url.trim_end_matches('/').to_string(),
         client:   reqwest::Client::new(),
      }
   }
}

/// 全 concern を束ねた統合トレイト
///
/// ハンドラ側はこのトレイトオブジェクト 1 つを保持すればよい。
pub trait BpmHistoryProvider: BpmTaskHistoryProvider + BpmVariableProvider {}

impl<T: BpmTaskHistoryProvider + BpmVariableProvider> BpmHistoryProvider for T {}

/// エンジンへのリクエストに共通ヘッダを付与する
///
/// リクエスト ID の伝搬と、ロケールの `Accept-Language` への変換を行う。
pub(super) fn prepare_request(
   builder: reqwest::RequestBuilder,
   locale: Option<&str>,
) -> reqwest::RequestBuilder {
   let builder = inject_request_id(builder);
   match locale {
      Some(locale) => builder.header(reqwest::header::ACCEPT_LANGUAGE, locale),
      None => builder,
   }
}
