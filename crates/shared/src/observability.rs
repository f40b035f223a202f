//! # Observability 基盤
//!
//! トレーシング初期化とログ出力形式の設定、および Request ID の生成・スパン付与を提供する。
//! 出力形式は環境変数 `LOG_FORMAT`（`json` / `pretty`）で切り替える。

/// Request ID を運ぶ HTTP ヘッダー名
///
/// `SetRequestIdLayer` / `PropagateRequestIdLayer` と揃えた小文字表記。
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// ログ出力形式（環境変数 `LOG_FORMAT` で切り替え）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 構造化 JSON。ログ基盤に流す本番用
    Json,
    /// 端末で読みやすい複数行形式。開発時の既定値
    #[default]
    Pretty,
}

impl LogFormat {
    /// `"json"` / `"pretty"` 以外は warning を stderr に出して
    /// [`Pretty`](LogFormat::Pretty) にフォールバックする
    pub fn parse(s: &str) -> Self {
        match s {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            other => {
                eprintln!("LOG_FORMAT={other:?} は解釈できないため pretty を使います");
                Self::Pretty
            }
        }
    }

    /// 環境変数 `LOG_FORMAT` から読み取る（未設定なら既定値）
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT") {
            Ok(val) => Self::parse(&val),
            Err(_) => Self::default(),
        }
    }
}

/// [`init_tracing`] に渡す初期化設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// サービス識別子。JSON ログでは `span.service` として現れる
    pub service_name: String,
    /// 出力形式
    pub log_format:   LogFormat,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
        }
    }

    /// 環境変数からログ形式を読み取って設定を組み立てる
    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self::new(service_name, LogFormat::from_env())
    }
}

/// グローバルの tracing subscriber を構成して登録する
///
/// ログレベルは `RUST_LOG` で制御する（未設定時は `"info,rirekiflow=debug"`）。
/// JSON モードではイベントフィールドをトップレベルへ展開する
/// （`timestamp`, `level`, `target`, `message`）。
///
/// サービス名は呼び出し側が `tracing::info_span!("app", service = "...")` を
/// 張ることで `span.service` として JSON に載る。
///
/// `ErrorLayer` も登録するため、インフラ層のエラーが捕捉する
/// `SpanTrace` にはエラー発生時点のスパン経路が記録される。
#[cfg(feature = "observability")]
pub fn init_tracing(config: TracingConfig) {
    use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,rirekiflow=debug".into());

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_target(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(tracing_error::ErrorLayer::default())
        .init();
}

/// UUID v7 で Request ID を生成する [`MakeRequestId`] 実装
///
/// v7 は時刻順ソート可能なため、ログ検索時にリクエストの時系列を保ったまま追跡できる。
///
/// [`MakeRequestId`]: tower_http::request_id::MakeRequestId
#[cfg(feature = "observability")]
#[derive(Debug, Clone, Copy)]
pub struct MakeRequestUuidV7;

#[cfg(feature = "observability")]
impl tower_http::request_id::MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(
        &mut self,
        _request: &http::Request<B>,
    ) -> Option<tower_http::request_id::RequestId> {
        let id = uuid::Uuid::now_v7().to_string();
        // UUID 文字列は常に有効な HeaderValue
        http::HeaderValue::from_str(&id)
            .ok()
            .map(tower_http::request_id::RequestId::new)
    }
}

/// リクエストスパンを作成する（`TraceLayer::make_span_with` 用）
///
/// `SetRequestIdLayer` が付与した `x-request-id` ヘッダーを読み取り、
/// スパンフィールド `request_id` として全ログに載せる。
/// レイヤー順序の都合でヘッダーが無い場合は `"unknown"` を記録する。
#[cfg(feature = "observability")]
pub fn make_request_span<B>(request: &http::Request<B>) -> tracing::Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri(),
    )
}
