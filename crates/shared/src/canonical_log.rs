//! # Canonical Log Line ミドルウェア
//!
//! リクエストごとに完了時点のサマリを1行へ集約して出力する tower Layer。
//! [Canonical Log Lines パターン](https://brandur.org/canonical-log-lines)
//! （Stripe 由来）の縮小版で、1リクエスト = 1行を保証することで
//! ステータス別の集計やレイテンシ調査をログ基盤側で完結できるようにする。
//!
//! TraceLayer とは役割を分ける。TraceLayer はスパン（request_id 等）の
//! 生成とコンテキスト管理、本 Layer は完了サマリ（method, path, status,
//! latency）の出力を担当する。TraceLayer の内側に置くことで、サマリ行にも
//! スパンフィールドが載る。
//!
//! liveness / readiness プローブは高頻度で叩かれるためサマリ出力の対象外。

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};

use http::{Request, Response};
use tower::{Layer, Service};

/// サマリ出力をスキップするパスかどうか
///
/// `/health`（liveness）とその配下（`/health/ready`）が対象。
fn is_health_check_path(path: &str) -> bool {
    path.starts_with("/health")
}

/// 完了サマリを出力する tower Layer
///
/// リクエストの完了を `log.type = "canonical"` マーカー付きのサマリとして
/// INFO（エラー時は ERROR）で1行出力する。ヘルスチェックパスは対象外。
/// request_id などのスパンフィールドを載せるため TraceLayer の内側に置く。
#[derive(Clone, Debug)]
pub struct CanonicalLogLineLayer;

impl<S> Layer<S> for CanonicalLogLineLayer {
    type Service = CanonicalLogLineService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CanonicalLogLineService { inner }
    }
}

/// [`CanonicalLogLineLayer`] が生成する Service 実装
#[derive(Clone, Debug)]
pub struct CanonicalLogLineService<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for CanonicalLogLineService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: std::fmt::Display + 'static,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
    type Response = S::Response;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        // poll_ready 済みの readiness は swap で取り出した側に引き継ぐ
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let method = req.method().to_string();
        let path = req.uri().path().to_owned();

        if is_health_check_path(&path) {
            return Box::pin(async move { inner.call(req).await });
        }

        let start = Instant::now();

        Box::pin(async move {
            let result = inner.call(req).await;
            let latency_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(response) => {
                    let status = response.status().as_u16();
                    tracing::info!(
                        log.r#type = "canonical",
                        http.method = %method,
                        http.path = %path,
                        http.status_code = status,
                        http.latency_ms = latency_ms,
                        "リクエストを処理しました"
                    );
                }
                Err(err) => {
                    tracing::error!(
                        log.r#type = "canonical",
                        http.method = %method,
                        http.path = %path,
                        http.latency_ms = latency_ms,
                        error.message = %err,
                        "リクエスト処理が失敗しました"
                    );
                }
            }

            result
        })
    }
}
