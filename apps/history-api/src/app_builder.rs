//! # History API アプリケーション構築
//!
//! ルート表の定義と DI の組み立てを `main.rs` から分離する。
//! エンドポイントとハンドラの対応はすべて [`task_history_routes`] に
//! 集め、[`crate::openapi`] の OpenAPI ドキュメントと突き合わせられる
//! ようにしておく。

use std::sync::Arc;

use axum::{
    Router,
    http::{Method, header},
    middleware::from_fn,
    routing::{get, post},
};
use rirekiflow_infra::SessionStore;
use rirekiflow_shared::{
    canonical_log::CanonicalLogLineLayer,
    observability::{MakeRequestUuidV7, make_request_span},
};
use tower_http::{
    cors::CorsLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    config::HistoryApiConfig,
    handler::{
        ReadinessState,
        TaskHistoryState,
        count_task_history,
        find_tasks_by_definition_key,
        find_tasks_by_process_instance,
        find_tasks_by_task_id,
        get_activity_variables,
        health_check,
        readiness_check,
    },
    middleware::{no_cache, request_id::store_request_id},
    provider::BpmHistoryProvider,
};

/// 履歴タスク API のルート表
///
/// ベースパス配下に nest される前提で、エンドポイントの相対パスを定義する。
pub fn task_history_routes(state: Arc<TaskHistoryState>) -> Router {
    Router::new()
        .route(
            "/task-history/{activity_instance_id}/variables",
            get(get_activity_variables),
        )
        .route(
            "/task-history/by-process-key",
            get(find_tasks_by_definition_key),
        )
        .route(
            "/task-history/by-process-instance/{process_instance_id}",
            get(find_tasks_by_process_instance),
        )
        .route("/task-history/by-task-id/{task_id}", get(find_tasks_by_task_id))
        .route("/task-history/count", post(count_task_history))
        .with_state(state)
}

/// 依存を注入してルーター全体を組み立てる
///
/// 接続済みのセッションストアとプロバイダを受け取るだけで、
/// この関数自体は I/O を行わない。
pub fn build_app(
    config: &HistoryApiConfig,
    session_store: Arc<dyn SessionStore>,
    provider: Arc<dyn BpmHistoryProvider>,
    readiness_state: Arc<ReadinessState>,
) -> Router {
    let task_history_state = Arc::new(TaskHistoryState {
        provider,
        session_store,
    });

    // readiness だけ独自の State を持つため、別 Router を merge で合流させる
    let router = Router::new()
        .route("/health", get(health_check))
        .merge(
            Router::new()
                .route("/health/ready", get(readiness_check))
                .with_state(readiness_state),
        );

    // ベースパスが "/" のときは nest できないため merge する
    let router = if config.base_path == "/" {
        router.merge(task_history_routes(task_history_state))
    } else {
        router.nest(&config.base_path, task_history_routes(task_history_state))
    };

    // CORS はフロントエンドのオリジンが設定されている場合のみ有効化する。
    // Cookie 認証のため allow_credentials が必要で、オリジンはワイルドカード不可
    let router = match &config.frontend_origin {
        Some(origin) => router.layer(
            CorsLayer::new()
                .allow_origin(origin.clone())
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT_LANGUAGE])
                .allow_credentials(true),
        ),
        None => router,
    };

    // 履歴の読み出し結果をブラウザにキャッシュさせない
    router
        .layer(from_fn(no_cache))
        // 以降は下に書いたレイヤーほど外側で実行される。リクエストはまず
        // SetRequestIdLayer で X-Request-Id（クライアント提供値がなければ
        // UUID v7）を持ち、TraceLayer がそれをスパンに載せて全ログへ注入する。
        // store_request_id は同じ ID を task-local に控え、プロバイダが
        // エンジンへのリクエストヘッダーに引き継ぐ。レスポンス側では
        // PropagateRequestIdLayer がヘッダーを返送し、CanonicalLogLineLayer
        // がスパン内で完了サマリを 1 行出力する。
        .layer(from_fn(store_request_id))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CanonicalLogLineLayer)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
