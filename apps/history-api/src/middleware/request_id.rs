//! # Request ID 伝播ミドルウェア
//!
//! 受信リクエストの Request ID を BPM エンジンへの転送リクエストまで引き継ぐ。
//!
//! [`store_request_id`] が `SetRequestIdLayer` の設定した
//! [`RequestId`](tower_http::request_id::RequestId) を task-local へ保存し、
//! [`inject_request_id`] が task-local の値を reqwest の `RequestBuilder` に
//! `x-request-id` ヘッダーとして載せる。これで API のログとエンジン側の
//! ログを同一 ID で突き合わせられる。
//!
//! ハンドラやプロバイダの引数に ID を引き回すのではなく task-local を使う。
//! Request ID は横断的関心事で、シグネチャに現れるべき情報ではないため。

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use rirekiflow_shared::observability::REQUEST_ID_HEADER;
use tower_http::request_id::RequestId;

tokio::task_local! {
    static REQUEST_ID: String;
}

/// 処理中のリクエストに紐づく Request ID を返す
///
/// task-local のスコープ外（テストなど）では `None`。
pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(|id| id.clone()).ok()
}

/// 受信リクエストの Request ID を task-local へ写すミドルウェア
///
/// `SetRequestIdLayer` がリクエスト extensions に設定した `RequestId` を
/// 読み取る。extensions に ID がない場合はスコープを張らず、
/// `current_request_id()` が `None` を返す（プレースホルダを下流へ
/// 転送しない）。
pub async fn store_request_id(request: Request<Body>, next: Next) -> Response {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .map(str::to_owned);

    match request_id {
        Some(id) => REQUEST_ID.scope(id, next.run(request)).await,
        None => next.run(request).await,
    }
}

/// reqwest リクエストビルダーに `x-request-id` ヘッダーを付与する
///
/// task-local に Request ID がなければビルダーをそのまま返す。
pub fn inject_request_id(builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    match current_request_id() {
        Some(id) => builder.header(REQUEST_ID_HEADER, id),
        None => builder,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_request_idはスコープ外でnoneを返す() {
        assert_eq!(current_request_id(), None);
    }

    #[tokio::test]
    async fn test_inject_request_idはスコープ内でヘッダーを付与する() {
        let client = reqwest::Client::new();

        let request = REQUEST_ID
            .scope("0198c5f2-req-id".to_string(), async {
                inject_request_id(client.get("http://engine.invalid/history/task"))
                    .build()
                    .unwrap()
            })
            .await;

        let header_value = request
            .headers()
            .get("x-request-id")
            .expect("x-request-id ヘッダーが載っていること");
        assert_eq!(header_value.to_str().unwrap(), "0198c5f2-req-id");
    }

    #[tokio::test]
    async fn test_inject_request_idはスコープ外でビルダーを変更しない() {
        let client = reqwest::Client::new();
        let request = inject_request_id(client.get("http://engine.invalid/history/task"))
            .build()
            .unwrap();

        assert!(
            request.headers().get("x-request-id").is_none(),
            "task-local 未設定時は x-request-id ヘッダーが付かないこと"
        );
    }
}
