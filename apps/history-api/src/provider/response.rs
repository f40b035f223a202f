//! エンジンレスポンスの共通ハンドリング
//!
//! クエリ系エンドポイントはすべて「2xx ならボディを型に起こす、
//! 404 なら操作ごとの未検出エラーに変換する、それ以外は `Unexpected`」
//! という同じ流れになるため、ここに集約する。

use serde::de::DeserializeOwned;

use super::error::BpmProviderError;

/// 成功レスポンスのボディを `T` にデシリアライズする
///
/// `not_found_error` を渡すと 404 がそのエラーに変換される。
/// `None` の場合、404 も `Unexpected` として扱う（一覧系クエリは
/// 空リストを 200 で返すため、404 はエンジン側の異常を意味する）。
pub(super) async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
    not_found_error: Option<BpmProviderError>,
) -> Result<T, BpmProviderError> {
    if response.status().is_success() {
        return Ok(response.json::<T>().await?);
    }
    Err(error_for(response, not_found_error).await)
}

/// ボディを読まずにステータスのみ検証する。存在確認のための GET に使う
pub(super) async fn ensure_found(
    response: reqwest::Response,
    not_found_error: BpmProviderError,
) -> Result<(), BpmProviderError> {
    if response.status().is_success() {
        return Ok(());
    }
    Err(error_for(response, Some(not_found_error)).await)
}

/// 非成功レスポンスを `BpmProviderError` に対応付ける
async fn error_for(
    response: reqwest::Response,
    not_found_error: Option<BpmProviderError>,
) -> BpmProviderError {
    let status = response.status();

    if status == reqwest::StatusCode::NOT_FOUND
        && let Some(err) = not_found_error
    {
        return err;
    }

    let body = response.text().await.unwrap_or_default();
    BpmProviderError::Unexpected(format!("予期しないステータス {status}: {body}"))
}
