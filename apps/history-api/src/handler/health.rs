//! # ヘルスチェックハンドラ
//!
//! 稼働確認用に 2 段階のエンドポイントを公開する。
//!
//! - `/health` — プロセスが生きていれば常に `"healthy"`（liveness）
//! - `/health/ready` — Redis と BPM エンジンに実際に到達できるかを
//!   確認し、どちらかが落ちていれば 503（readiness）
//!
//! レスポンスの形は [`rirekiflow_shared::health`] の型が定義する。
//! OpenAPI ドキュメントは [`crate::openapi`] がルート表から組み立てる。

use std::{sync::Arc, time::Duration};

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use redis::aio::ConnectionManager;
use rirekiflow_shared::{
    CheckStatus, HealthResponse, ReadinessChecks, ReadinessResponse, ReadinessStatus,
};

/// 依存サービス 1 件あたりの疎通確認タイムアウト
const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Liveness エンドポイント
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status:  "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness エンドポイントが依存確認に使う接続類
pub struct ReadinessState {
    pub redis_conn:     ConnectionManager,
    pub bpm_engine_url: String,
    pub http_client:    reqwest::Client,
}

/// Readiness エンドポイント
///
/// Redis と BPM エンジンを並行に確認し、両方応答すれば 200、
/// 欠けがあれば 503 で内訳を返す。
#[tracing::instrument(skip_all)]
pub async fn readiness_check(State(state): State<Arc<ReadinessState>>) -> impl IntoResponse {
    let (redis, bpm_engine) = tokio::join!(
        check_redis(state.redis_conn.clone()),
        check_bpm_engine(&state.http_client, &state.bpm_engine_url),
    );
    let checks = ReadinessChecks { redis, bpm_engine };

    let (status, http_status) = if checks.all_ok() {
        (ReadinessStatus::Ready, StatusCode::OK)
    } else {
        (ReadinessStatus::NotReady, StatusCode::SERVICE_UNAVAILABLE)
    };

    (http_status, Json(ReadinessResponse { status, checks }))
}

/// Redis に PING を打って疎通を確認する
async fn check_redis(mut conn: ConnectionManager) -> CheckStatus {
    let cmd = redis::cmd("PING");
    let ping = cmd.query_async::<String>(&mut conn);
    match tokio::time::timeout(CHECK_TIMEOUT, ping).await {
        Ok(Ok(_)) => CheckStatus::Ok,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "readiness: Redis の PING に失敗しました");
            CheckStatus::Error
        }
        Err(_) => {
            tracing::warn!("readiness: Redis の確認がタイムアウトしました");
            CheckStatus::Error
        }
    }
}

/// BPM エンジンのエンジン一覧エンドポイントで疎通を確認する
///
/// `/engine` は認証不要かつ軽量なため確認先に使う。
async fn check_bpm_engine(client: &reqwest::Client, base_url: &str) -> CheckStatus {
    let url = format!("{base_url}/engine");
    match tokio::time::timeout(CHECK_TIMEOUT, client.get(&url).send()).await {
        Ok(Ok(response)) if response.status().is_success() => CheckStatus::Ok,
        Ok(Ok(response)) => {
            tracing::warn!(
                status = %response.status(),
                "readiness: BPM エンジンが成功以外のステータスを返しました"
            );
            CheckStatus::Error
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "readiness: BPM エンジンへのリクエストに失敗しました");
            CheckStatus::Error
        }
        Err(_) => {
            tracing::warn!("readiness: BPM エンジンの確認がタイムアウトしました");
            CheckStatus::Error
        }
    }
}
