//! # History API エラーハンドリング
//!
//! 認証・認可ヘルパーと、各種エラーから RFC 9457 レスポンスへの変換を
//! 集約する。ハンドラはここの関数を呼ぶだけで統一されたエラー形式になる。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use rirekiflow_domain::authz::{PermissionLevel, ResourceType, check_permission};
use rirekiflow_infra::{SessionData, SessionStore};
use rirekiflow_shared::ErrorResponse;

use crate::provider::BpmProviderError;

/// セッション Cookie の名前
const SESSION_COOKIE_NAME: &str = "session_id";

// --- 認証・認可 ---

/// Cookie のセッション ID から呼び出し元を特定する
///
/// Cookie が付いていない、またはセッションストアに該当がない場合は
/// 401 レスポンスを返す。ストア自体の障害は 401 と区別し、500 に落とす。
pub async fn authenticate(
    session_store: &dyn SessionStore,
    jar: &CookieJar,
) -> Result<SessionData, Response> {
    let Some(cookie) = jar.get(SESSION_COOKIE_NAME) else {
        return Err(unauthorized_response());
    };

    match session_store.get(cookie.value()).await {
        Ok(Some(data)) => Ok(data),
        Ok(None) => Err(unauthorized_response()),
        Err(e) => {
            tracing::error!(
                error.source = "session_store",
                error.span_trace = %e.span_trace(),
                "セッションの参照に失敗しました: {}",
                e
            );
            Err(internal_error_response())
        }
    }
}

/// 権限ゲートを実行する
///
/// セッションの権限リストに対して要求権限を判定する。
/// 不足している場合は拒否を warn ログに出力し、403 レスポンスを返す。
/// 拒否時はハンドラが即座にリターンするため、プロバイダ呼び出しは発生しない。
pub fn authorize(
    session: &SessionData,
    resource: ResourceType,
    required: PermissionLevel,
) -> Result<(), Response> {
    check_permission(session.grants(), resource, required).map_err(|denied| {
        tracing::warn!(
            user_id = %session.user_id(),
            resource = %denied.resource,
            required = %denied.required,
            "権限ゲートで拒否: {}",
            denied
        );
        forbidden_response("この操作を実行する権限がありません")
    })
}

// --- プロバイダエラーの変換 ---

impl IntoResponse for BpmProviderError {
    fn into_response(self) -> Response {
        match self {
            BpmProviderError::ActivityInstanceNotFound(_) => not_found_response(
                "activity-instance-not-found",
                "Activity Instance Not Found",
                "アクティビティインスタンスが見つかりません",
            ),
            BpmProviderError::NoMatchingTasks => not_found_response(
                "task-history-not-found",
                "Task History Not Found",
                "該当する履歴タスクが見つかりません",
            ),
            BpmProviderError::Network(_) | BpmProviderError::Unexpected(_) => {
                internal_error_response()
            }
        }
    }
}

/// プロバイダエラーを記録してからレスポンスに変換する
///
/// `Network` と `Unexpected` は 500 に丸められ、クライアントからは
/// 原因が見えなくなる。そのため変換前にコンテキスト付きで記録する。
pub fn log_and_convert_provider_error(context: &str, err: BpmProviderError) -> Response {
    if matches!(
        err,
        BpmProviderError::Network(_) | BpmProviderError::Unexpected(_)
    ) {
        tracing::error!(
            error.source = "bpm_engine",
            "{}でエンジンとの通信に失敗しました: {}",
            context,
            err
        );
    }
    err.into_response()
}

// --- レスポンス組み立て ---

fn problem(status: StatusCode, body: ErrorResponse) -> Response {
    (status, Json(body)).into_response()
}

/// 401 Unauthorized レスポンス
pub fn unauthorized_response() -> Response {
    problem(
        StatusCode::UNAUTHORIZED,
        ErrorResponse::unauthorized("認証が必要です"),
    )
}

/// 500 Internal Server Error レスポンス（detail は固定文言）
pub fn internal_error_response() -> Response {
    problem(
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorResponse::internal_error(),
    )
}

/// 404 Not Found レスポンス（type と文言は呼び出し側が指定する）
pub fn not_found_response(error_type_suffix: &str, title: &str, detail: &str) -> Response {
    problem(
        StatusCode::NOT_FOUND,
        ErrorResponse::new(error_type_suffix, title, 404, detail),
    )
}

/// 400 Bad Request レスポンス
pub fn validation_error_response(detail: &str) -> Response {
    problem(
        StatusCode::BAD_REQUEST,
        ErrorResponse::validation_error(detail),
    )
}

/// 403 Forbidden（権限不足）レスポンス
pub fn forbidden_response(detail: &str) -> Response {
    problem(StatusCode::FORBIDDEN, ErrorResponse::forbidden(detail))
}
