//! # 履歴タスク API ハンドラ
//!
//! BPM エンジンの履歴タスクを参照するエンドポイントを提供する。
//!
//! ## エンドポイント一覧
//!
//! - `GET {base}/task-history/{activity_instance_id}/variables` - アクティビティの履歴変数取得
//! - `GET {base}/task-history/by-process-key` - タスク定義キーとプロセスインスタンスで検索
//! - `GET {base}/task-history/by-process-instance/{process_instance_id}` - プロセスインスタンスで検索
//! - `GET {base}/task-history/by-task-id/{task_id}` - タスク ID で検索
//! - `POST {base}/task-history/count` - フィルタ条件に一致する件数取得
//!
//! ## 処理の順序
//!
//! - 各ハンドラは「入力検証 → 認証 → 権限ゲート → プロバイダ委譲 → 変換」の順で処理する
//! - 入力検証はセッション参照より先に行う（不正な入力で外部アクセスを発生させない）
//! - 権限ゲートで拒否された場合、プロバイダ呼び出しは発生しない
//! - 件数取得のみ権限ゲートを通さない（件数は一覧表示のバッジ用で、
//!   タスク内容を含まないため）
//!
//! OpenAPI ドキュメントは [`crate::openapi`] がルート表から組み立てる。

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use rirekiflow_domain::authz::{PermissionLevel, ResourceType};
use rirekiflow_infra::SessionStore;
use serde::Deserialize;

use crate::{
    error::{authenticate, authorize, log_and_convert_provider_error, validation_error_response},
    provider::BpmHistoryProvider,
};

/// 履歴タスク API の共有状態
pub struct TaskHistoryState {
    pub provider:      Arc<dyn BpmHistoryProvider>,
    pub session_store: Arc<dyn SessionStore>,
}

// --- クエリパラメータ型 ---

/// タスク定義キー検索のクエリパラメータ
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindByDefinitionKeyQuery {
    pub task_definition_key: String,
    pub process_instance_id: String,
}

// --- ヘルパー ---

/// `Accept-Language` ヘッダからロケールを取り出す
///
/// 値はプロバイダにそのまま渡し、エンジンへのリクエストに引き継がれる。
fn extract_locale(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
}

// --- ハンドラ ---

/// GET {base}/task-history/{activity_instance_id}/variables
///
/// アクティビティインスタンスに紐づく履歴変数の一覧を取得する。
/// アクティビティインスタンスが存在しないときは 404、
/// 存在するが変数がないときは空リストを返す。
#[tracing::instrument(skip_all, fields(%activity_instance_id))]
pub async fn get_activity_variables(
    State(state): State<Arc<TaskHistoryState>>,
    headers: HeaderMap,
    jar: CookieJar,
    Path(activity_instance_id): Path<String>,
) -> Result<Response, Response> {
    if activity_instance_id.trim().is_empty() {
        return Err(validation_error_response(
            "activityInstanceId を指定してください",
        ));
    }

    let session_data = authenticate(state.session_store.as_ref(), &jar).await?;
    authorize(
        &session_data,
        ResourceType::HistoricTask,
        PermissionLevel::ReadAll,
    )?;

    let variables = state
        .provider
        .fetch_activity_variables_history(
            &activity_instance_id,
            &session_data,
            extract_locale(&headers),
        )
        .await
        .map_err(|e| log_and_convert_provider_error("履歴変数取得", e))?;

    Ok((StatusCode::OK, Json(variables)).into_response())
}

/// GET {base}/task-history/by-process-key
///
/// タスク定義キーとプロセスインスタンス ID で履歴タスクを検索する。
/// 該当タスクが 1 件もないときは 404 を返す。
#[tracing::instrument(skip_all)]
pub async fn find_tasks_by_definition_key(
    State(state): State<Arc<TaskHistoryState>>,
    headers: HeaderMap,
    jar: CookieJar,
    Query(query): Query<FindByDefinitionKeyQuery>,
) -> Result<Response, Response> {
    if query.task_definition_key.trim().is_empty() {
        return Err(validation_error_response(
            "taskDefinitionKey を指定してください",
        ));
    }
    if query.process_instance_id.trim().is_empty() {
        return Err(validation_error_response(
            "processInstanceId を指定してください",
        ));
    }

    let session_data = authenticate(state.session_store.as_ref(), &jar).await?;
    authorize(&session_data, ResourceType::Task, PermissionLevel::ReadAll)?;

    let tasks = state
        .provider
        .find_tasks_by_definition_key(
            &query.task_definition_key,
            &query.process_instance_id,
            &session_data,
            extract_locale(&headers),
        )
        .await
        .map_err(|e| log_and_convert_provider_error("履歴タスク検索（タスク定義キー）", e))?;

    Ok((StatusCode::OK, Json(tasks)).into_response())
}

/// GET {base}/task-history/by-process-instance/{process_instance_id}
///
/// プロセスインスタンス ID で履歴タスクを検索する。
/// 該当タスクが 1 件もないときは 404 を返す。
#[tracing::instrument(skip_all, fields(%process_instance_id))]
pub async fn find_tasks_by_process_instance(
    State(state): State<Arc<TaskHistoryState>>,
    headers: HeaderMap,
    jar: CookieJar,
    Path(process_instance_id): Path<String>,
) -> Result<Response, Response> {
    if process_instance_id.trim().is_empty() {
        return Err(validation_error_response(
            "processInstanceId を指定してください",
        ));
    }

    let session_data = authenticate(state.session_store.as_ref(), &jar).await?;
    authorize(&session_data, ResourceType::Task, PermissionLevel::ReadAll)?;

    let tasks = state
        .provider
        .find_tasks_by_process_instance(
            &process_instance_id,
            &session_data,
            extract_locale(&headers),
        )
        .await
        .map_err(|e| {
            log_and_convert_provider_error("履歴タスク検索（プロセスインスタンス）", e)
        })?;

    Ok((StatusCode::OK, Json(tasks)).into_response())
}

/// GET {base}/task-history/by-task-id/{task_id}
///
/// タスク ID で履歴タスクを検索する。同一タスクの履歴エントリが
/// 複数ありうるためリストで返す。該当が 1 件もないときは 404 を返す。
#[tracing::instrument(skip_all, fields(%task_id))]
pub async fn find_tasks_by_task_id(
    State(state): State<Arc<TaskHistoryState>>,
    headers: HeaderMap,
    jar: CookieJar,
    Path(task_id): Path<String>,
) -> Result<Response, Response> {
    if task_id.trim().is_empty() {
        return Err(validation_error_response("taskId を指定してください"));
    }

    let session_data = authenticate(state.session_store.as_ref(), &jar).await?;
    authorize(&session_data, ResourceType::Task, PermissionLevel::ReadAll)?;

    let tasks = state
        .provider
        .find_tasks_by_task_id(&task_id, &session_data, extract_locale(&headers))
        .await
        .map_err(|e| log_and_convert_provider_error("履歴タスク検索（タスクID）", e))?;

    Ok((StatusCode::OK, Json(tasks)).into_response())
}

/// POST {base}/task-history/count
///
/// フィルタ条件に一致する履歴タスクの件数を取得する。
/// フィルタはエンジンにそのまま渡し、結果は裸の整数で返す。
/// 該当 0 件でも 404 にはせず `0` を返す。
#[tracing::instrument(skip_all)]
pub async fn count_task_history(
    State(state): State<Arc<TaskHistoryState>>,
    headers: HeaderMap,
    jar: CookieJar,
    Json(filters): Json<serde_json::Value>,
) -> Result<Response, Response> {
    let session_data = authenticate(state.session_store.as_ref(), &jar).await?;

    let count = state
        .provider
        .count_history_tasks(&filters, &session_data, extract_locale(&headers))
        .await
        .map_err(|e| log_and_convert_provider_error("履歴タスク件数取得", e))?;

    Ok((StatusCode::OK, Json(count)).into_response())
}
