//! # History API サーバー
//!
//! BPM エンジンの履歴タスクを参照する REST アダプタサーバー。
//!
//! ## 役割
//!
//! History API はフロントエンドと BPM エンジンの間に位置し、
//! 責務を次の三つに絞っている:
//!
//! - **認証**: HTTPOnly Cookie によるセッション参照（セッションは認証基盤が発行）
//! - **権限ゲート**: セッションの権限リストによる履歴参照の認可
//! - **プロバイダ委譲**: エンジンの履歴 REST API への問い合わせと結果変換
//!
//! ## アーキテクチャ
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │   Browser    │────▶│ History API  │────▶│  BPM Engine  │
//! │              │     │  port: 13100 │     │  (REST API)  │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!                             │
//!                             ▼
//!                      ┌──────────────┐
//!                      │    Redis     │
//!                      │  (Session)   │
//!                      └──────────────┘
//! ```
//!
//! ## 環境変数
//!
//! 開発環境ではリポジトリ直下の `.env` ファイルから読み込む。
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `HISTORY_API_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `HISTORY_API_PORT` | **Yes** | ポート番号 |
//! | `REDIS_URL` | **Yes** | セッションストア（Redis）の接続 URL |
//! | `BPM_ENGINE_URL` | **Yes** | BPM エンジンの REST API URL |
//! | `SERVICES_BASE_PATH` | No | API のベースパス（デフォルト: `/services/v1`） |
//! | `FRONTEND_ORIGIN` | No | CORS を許可するフロントエンドのオリジン |
//! | `DEV_AUTH_ENABLED` | No | 開発用の固定セッション投入（`true` で有効） |
//!
//! ## 起動方法
//!
//! ```bash
//! # ローカル開発（.env から設定を読む）
//! cargo run -p rirekiflow-history-api
//!
//! # 本番想定（環境変数を直接渡す）
//! HISTORY_API_PORT=3000 REDIS_URL=redis://... cargo run -p rirekiflow-history-api --release
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
#[cfg(feature = "dev-auth")]
use rirekiflow_history_api::dev_auth;
use rirekiflow_history_api::{
    app_builder::build_app,
    config::HistoryApiConfig,
    handler::ReadinessState,
    provider::{BpmEngineClient, BpmHistoryProvider},
};
use rirekiflow_infra::{RedisSessionStore, SessionStore};
use rirekiflow_shared::observability::TracingConfig;
use tokio::net::TcpListener;

/// History API サーバーのエントリーポイント
///
/// 環境変数の読み込み → トレーシング初期化 → 設定読み込み →
/// 依存の組み立て → HTTP サーバー起動、の順に進む。
/// 設定不備と接続失敗はここで即座にプロセスを終了させる。
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env が無い環境（本番）では何もしない
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env("history-api");
    rirekiflow_shared::observability::init_tracing(tracing_config);
    let _tracing_guard = tracing::info_span!("app", service = "history-api").entered();

    let config = HistoryApiConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "History API サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    let redis_session_store = RedisSessionStore::new(&config.redis_url)
        .await
        .context("Redis への接続に失敗しました")?;

    // 開発用の固定セッション投入（dev-auth フィーチャ時のみビルドされる）
    #[cfg(feature = "dev-auth")]
    if config.dev_auth_enabled {
        tracing::warn!("DevAuth 有効: 固定セッションで認証をバイパスします（開発専用）");

        match dev_auth::setup_dev_session(&redis_session_store).await {
            Ok(()) => {
                tracing::info!(
                    user_id = %dev_auth::DEV_USER_ID,
                    session_id = dev_auth::DEV_SESSION_ID,
                    "DevAuth: 開発用セッションを作成しました"
                );
            }
            Err(e) => {
                tracing::error!("DevAuth: 開発用セッションの投入に失敗しました: {}", e);
            }
        }
    }

    #[cfg(not(feature = "dev-auth"))]
    if config.dev_auth_enabled {
        tracing::warn!(
            "DEV_AUTH_ENABLED が設定されていますが、dev-auth フィーチャが無効のため無視します"
        );
    }

    // Readiness Check は接続マネージャを共有する（コマンド送信時に clone される）
    let readiness_state = Arc::new(ReadinessState {
        redis_conn:     redis_session_store.connection(),
        bpm_engine_url: config.bpm_engine_url.clone(),
        http_client:    reqwest::Client::new(),
    });

    // 具象型で保持し、State 注入時に必要なトレイトオブジェクトへ coerce する
    let session_store: Arc<dyn SessionStore> = Arc::new(redis_session_store);
    let provider: Arc<dyn BpmHistoryProvider> =
        Arc::new(BpmEngineClient::new(&config.bpm_engine_url));

    let app = build_app(&config, session_store, provider, readiness_state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("バインドアドレスの形式が不正です")?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("History API サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
