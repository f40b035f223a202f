//! # 履歴レスポンスのキャッシュ抑止
//!
//! 履歴の照会結果はセッションの権限により変わり、同一 URL でも利用者ごとに
//! 内容が異なる。ブラウザや中間キャッシュに保持されないよう、全レスポンスへ
//! `Cache-Control: no-store` を設定する。

use axum::{
    extract::Request,
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};

/// 全レスポンスに `Cache-Control: no-store` を載せる
///
/// ハンドラが別の `Cache-Control` を設定していても上書きする。
pub async fn no_cache(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
