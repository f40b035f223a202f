//! 履歴タスク API の統合テスト
//!
//! ルーターからハンドラまでの「検証 → 認証 → 権限ゲート → プロバイダ委譲」の
//! 流れを、プロバイダとセッション管理のスタブで検証する。主な検証項目:
//!
//! - Cookie なし / セッションなしで 401（プロバイダは呼ばれない）
//! - READ 権限のみでは 403（READ_ALL は含意されない。プロバイダは呼ばれない）
//! - 入力検証はセッション参照より先に実行される（400 が 401 に優先）
//! - アクティビティ不存在で 404、変数 0 件は 200 の空リスト
//! - 検索結果はプロバイダの返した順序のまま返す
//! - 該当タスクなしで 404
//! - 件数取得は権限なしでも 200 で、裸の整数を返す
//! - プロバイダの通信エラーは 500 に変換される
//! - パラメータ・識別情報・ロケールがプロバイダにそのまま渡る

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use rirekiflow_domain::{
    authz::{Grant, PermissionLevel, ResourceType},
    user::UserId,
};
use rirekiflow_history_api::{
    app_builder::task_history_routes,
    handler::TaskHistoryState,
    provider::{
        BpmProviderError,
        BpmTaskHistoryProvider,
        BpmVariableProvider,
        TaskHistoryDto,
        VariableHistoryDto,
    },
};
use rirekiflow_infra::{SessionData, SessionStore, SessionStoreError};
use tower::ServiceExt;
use uuid::Uuid;

/// テスト用の固定ユーザー ID
const TEST_USER_ID: &str = "00000000-0000-0000-0000-000000000002";

// --- セッションスタブ ---

/// どのセッション ID にも同じ内容（または None）を返すセッションストア
struct StubSessionStore {
    session: Option<SessionData>,
}

impl StubSessionStore {
    fn no_session() -> Self {
        Self { session: None }
    }

    fn with_grants(grants: Vec<Grant>) -> Self {
        Self {
            session: Some(SessionData::new(
                UserId::from_uuid(Uuid::parse_str(TEST_USER_ID).unwrap()),
                "hanako.sato@example.com".to_string(),
                "佐藤花子".to_string(),
                grants,
            )),
        }
    }
}

#[async_trait]
impl SessionStore for StubSessionStore {
    async fn create(&self, _data: &SessionData) -> Result<String, SessionStoreError> {
        Ok(Uuid::now_v7().to_string())
    }

    async fn create_with_id(
        &self,
        _session_id: &str,
        _data: &SessionData,
    ) -> Result<(), SessionStoreError> {
        Ok(())
    }

    async fn get(&self, _session_id: &str) -> Result<Option<SessionData>, SessionStoreError> {
        Ok(self.session.clone())
    }

    async fn delete(&self, _session_id: &str) -> Result<(), SessionStoreError> {
        Ok(())
    }

    async fn get_ttl(&self, _session_id: &str) -> Result<Option<i64>, SessionStoreError> {
        Ok(Some(28800))
    }
}

// --- プロバイダスタブ ---

/// 呼び出しを記録するスタブプロバイダ
///
/// 各メソッドは受け取った引数を文字列化して記録し、設定された結果を返す。
/// 権限ゲートで拒否されたリクエストでは記録が空のままであることを検証できる。
struct StubProvider {
    calls:            Mutex<Vec<String>>,
    tasks_result:     Result<Vec<TaskHistoryDto>, BpmProviderError>,
    variables_result: Result<Vec<VariableHistoryDto>, BpmProviderError>,
    count_result:     Result<u64, BpmProviderError>,
}

impl StubProvider {
    fn new() -> Self {
        Self {
            calls:            Mutex::new(Vec::new()),
            tasks_result:     Ok(Vec::new()),
            variables_result: Ok(Vec::new()),
            count_result:     Ok(0),
        }
    }

    fn with_tasks(tasks: Vec<TaskHistoryDto>) -> Self {
        Self {
            tasks_result: Ok(tasks),
            ..Self::new()
        }
    }

    fn with_tasks_error(err: BpmProviderError) -> Self {
        Self {
            tasks_result: Err(err),
            ..Self::new()
        }
    }

    fn with_variables_error(err: BpmProviderError) -> Self {
        Self {
            variables_result: Err(err),
            ..Self::new()
        }
    }

    fn with_count(count: u64) -> Self {
        Self {
            count_result: Ok(count),
            ..Self::new()
        }
    }

    fn with_count_error(err: BpmProviderError) -> Self {
        Self {
            count_result: Err(err),
            ..Self::new()
        }
    }

    fn record(&self, entry: String) {
        self.calls.lock().unwrap().push(entry);
    }

    fn recorded_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BpmTaskHistoryProvider for StubProvider {
    async fn find_tasks_by_definition_key(
        &self,
        task_definition_key: &str,
        process_instance_id: &str,
        user: &SessionData,
        locale: Option<&str>,
    ) -> Result<Vec<TaskHistoryDto>, BpmProviderError> {
        self.record(format!(
            "find_tasks_by_definition_key({task_definition_key}, {process_instance_id}, user={}, locale={locale:?})",
            user.user_id()
        ));
        self.tasks_result.clone()
    }

    async fn find_tasks_by_process_instance(
        &self,
        process_instance_id: &str,
        user: &SessionData,
        locale: Option<&str>,
    ) -> Result<Vec<TaskHistoryDto>, BpmProviderError> {
        self.record(format!(
            "find_tasks_by_process_instance({process_instance_id}, user={}, locale={locale:?})",
            user.user_id()
        ));
        self.tasks_result.clone()
    }

    async fn find_tasks_by_task_id(
        &self,
        task_id: &str,
        user: &SessionData,
        locale: Option<&str>,
    ) -> Result<Vec<TaskHistoryDto>, BpmProviderError> {
        self.record(format!(
            "find_tasks_by_task_id({task_id}, user={}, locale={locale:?})",
            user.user_id()
        ));
        self.tasks_result.clone()
    }

    async fn count_history_tasks(
        &self,
        filters: &serde_json::Value,
        user: &SessionData,
        locale: Option<&str>,
    ) -> Result<u64, BpmProviderError> {
        self.record(format!(
            "count_history_tasks({filters}, user={}, locale={locale:?})",
            user.user_id()
        ));
        self.count_result.clone()
    }
}

#[async_trait]
impl BpmVariableProvider for StubProvider {
    async fn fetch_activity_variables_history(
        &self,
        activity_instance_id: &str,
        user: &SessionData,
        locale: Option<&str>,
    ) -> Result<Vec<VariableHistoryDto>, BpmProviderError> {
        self.record(format!(
            "fetch_activity_variables_history({activity_instance_id}, user={}, locale={locale:?})",
            user.user_id()
        ));
        self.variables_result.clone()
    }
}

// --- 組み立てヘルパー ---

fn create_test_app(provider: Arc<StubProvider>, session_store: StubSessionStore) -> Router {
    let state = Arc::new(TaskHistoryState {
        provider,
        session_store: Arc::new(session_store),
    });
    Router::new().nest("/services/v1", task_history_routes(state))
}

/// セッション Cookie 付きの GET リクエスト
fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("Cookie", "session_id=hist-test-session")
        .body(Body::empty())
        .unwrap()
}

fn make_task(id: &str) -> TaskHistoryDto {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "name": format!("タスク {id}"),
        "taskDefinitionKey": "approve",
    }))
    .unwrap()
}

fn task_read_all_grants() -> Vec<Grant> {
    vec![Grant::new(ResourceType::Task, PermissionLevel::ReadAll)]
}

fn historic_task_read_all_grants() -> Vec<Grant> {
    vec![Grant::new(
        ResourceType::HistoricTask,
        PermissionLevel::ReadAll,
    )]
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

// --- 認証 ---

#[tokio::test]
async fn test_cookieなしで401かつプロバイダは呼ばれない() {
    let provider = Arc::new(StubProvider::new());
    let sut = create_test_app(provider.clone(), StubSessionStore::no_session());

    let response = sut
        .oneshot(
            Request::builder()
                .uri("/services/v1/task-history/by-task-id/T1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(provider.recorded_calls().is_empty());
}

#[tokio::test]
async fn test_セッションが存在しない場合は401() {
    let provider = Arc::new(StubProvider::new());
    let sut = create_test_app(provider.clone(), StubSessionStore::no_session());

    let response = sut
        .oneshot(get_request("/services/v1/task-history/by-task-id/T1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(provider.recorded_calls().is_empty());
}

// --- 権限ゲート ---

#[tokio::test]
async fn test_read権限のみでは403かつプロバイダは呼ばれない() {
    // READ は READ_ALL を含意しない
    let provider = Arc::new(StubProvider::with_tasks(vec![make_task("T1")]));
    let sut = create_test_app(
        provider.clone(),
        StubSessionStore::with_grants(vec![Grant::new(
            ResourceType::Task,
            PermissionLevel::Read,
        )]),
    );

    let response = sut
        .oneshot(get_request("/services/v1/task-history/by-task-id/T1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(
        provider.recorded_calls().is_empty(),
        "権限ゲートで拒否された場合、プロバイダ呼び出しは発生しないこと"
    );
}

#[tokio::test]
async fn test_タスク検索にhistoric_task権限では403() {
    // 検索系は TASK / READ_ALL を要求する
    let provider = Arc::new(StubProvider::with_tasks(vec![make_task("T1")]));
    let sut = create_test_app(
        provider.clone(),
        StubSessionStore::with_grants(historic_task_read_all_grants()),
    );

    let response = sut
        .oneshot(get_request("/services/v1/task-history/by-task-id/T1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(provider.recorded_calls().is_empty());
}

// --- 入力検証 ---

#[tokio::test]
async fn test_空白のみのタスク定義キーで400() {
    // セッションなしでも 400 が返ることで、検証が認証より先であることを確認する
    let provider = Arc::new(StubProvider::new());
    let sut = create_test_app(provider.clone(), StubSessionStore::no_session());

    let response = sut
        .oneshot(
            Request::builder()
                .uri(
                    "/services/v1/task-history/by-process-key?taskDefinitionKey=%20&processInstanceId=P1",
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(provider.recorded_calls().is_empty());
}

#[tokio::test]
async fn test_クエリパラメータ欠落で400() {
    let provider = Arc::new(StubProvider::new());
    let sut = create_test_app(
        provider.clone(),
        StubSessionStore::with_grants(task_read_all_grants()),
    );

    let response = sut
        .oneshot(get_request(
            "/services/v1/task-history/by-process-key?taskDefinitionKey=approve",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(provider.recorded_calls().is_empty());
}

#[tokio::test]
async fn test_空白のみのアクティビティインスタンスidで400() {
    let provider = Arc::new(StubProvider::new());
    let sut = create_test_app(provider.clone(), StubSessionStore::no_session());

    let response = sut
        .oneshot(get_request("/services/v1/task-history/%20/variables"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(provider.recorded_calls().is_empty());
}

// --- 履歴変数取得 ---

#[tokio::test]
async fn test_アクティビティ不存在で404() {
    let provider = Arc::new(StubProvider::with_variables_error(
        BpmProviderError::ActivityInstanceNotFound("A1".to_string()),
    ));
    let sut = create_test_app(
        provider,
        StubSessionStore::with_grants(historic_task_read_all_grants()),
    );

    let response = sut
        .oneshot(get_request("/services/v1/task-history/A1/variables"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert!(
        body["type"]
            .as_str()
            .unwrap()
            .ends_with("/activity-instance-not-found")
    );
}

#[tokio::test]
async fn test_変数0件は200の空リスト() {
    // アクティビティは存在するが変数がないケース。404 にしない
    let provider = Arc::new(StubProvider::new());
    let sut = create_test_app(
        provider,
        StubSessionStore::with_grants(historic_task_read_all_grants()),
    );

    let response = sut
        .oneshot(get_request("/services/v1/task-history/A1/variables"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn test_履歴変数取得にtask権限では403() {
    // 変数取得は HISTORIC_TASK / READ_ALL を要求する
    let provider = Arc::new(StubProvider::new());
    let sut = create_test_app(
        provider.clone(),
        StubSessionStore::with_grants(task_read_all_grants()),
    );

    let response = sut
        .oneshot(get_request("/services/v1/task-history/A1/variables"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(provider.recorded_calls().is_empty());
}

// --- 履歴タスク検索 ---

#[tokio::test]
async fn test_検索結果をプロバイダの順序のまま返す() {
    let provider = Arc::new(StubProvider::with_tasks(vec![
        make_task("T2"),
        make_task("T1"),
    ]));
    let sut = create_test_app(
        provider,
        StubSessionStore::with_grants(task_read_all_grants()),
    );

    let response = sut
        .oneshot(get_request(
            "/services/v1/task-history/by-process-key?taskDefinitionKey=approve&processInstanceId=P1",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["T2", "T1"], "順序を並べ替えないこと");
}

#[tokio::test]
async fn test_該当タスクなしで404() {
    let provider = Arc::new(StubProvider::with_tasks_error(
        BpmProviderError::NoMatchingTasks,
    ));
    let sut = create_test_app(
        provider,
        StubSessionStore::with_grants(task_read_all_grants()),
    );

    let response = sut
        .oneshot(get_request(
            "/services/v1/task-history/by-process-instance/P1",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert!(
        body["type"]
            .as_str()
            .unwrap()
            .ends_with("/task-history-not-found")
    );
}

#[tokio::test]
async fn test_パラメータと識別情報とロケールがプロバイダに渡る() {
    let provider = Arc::new(StubProvider::with_tasks(vec![make_task("T1")]));
    let sut = create_test_app(
        provider.clone(),
        StubSessionStore::with_grants(task_read_all_grants()),
    );

    let response = sut
        .oneshot(
            Request::builder()
                .uri("/services/v1/task-history/by-task-id/T1")
                .header("Cookie", "session_id=hist-test-session")
                .header("Accept-Language", "de")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        provider.recorded_calls(),
        vec![format!(
            "find_tasks_by_task_id(T1, user={TEST_USER_ID}, locale=Some(\"de\"))"
        )]
    );
}

#[tokio::test]
async fn test_プロバイダの通信エラーは500に変換される() {
    let provider = Arc::new(StubProvider::with_tasks_error(BpmProviderError::Network(
        "接続失敗".to_string(),
    )));
    let sut = create_test_app(
        provider,
        StubSessionStore::with_grants(task_read_all_grants()),
    );

    let response = sut
        .oneshot(get_request(
            "/services/v1/task-history/by-process-instance/P1",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    // 上流の詳細をクライアントに漏らさない
    assert_eq!(body["detail"], "内部エラーが発生しました");
}

// --- 件数取得 ---

fn count_request(filters: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/services/v1/task-history/count")
        .header("content-type", "application/json")
        .header("Cookie", "session_id=hist-test-session")
        .body(Body::from(filters.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_件数取得は権限なしでも200で裸の整数を返す() {
    // 件数取得には権限ゲートがない。付与リストが空でも通る
    let provider = Arc::new(StubProvider::with_count(3));
    let sut = create_test_app(
        provider.clone(),
        StubSessionStore::with_grants(Vec::new()),
    );

    let response = sut
        .oneshot(count_request(serde_json::json!({"processInstanceId": "P1"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"3", "エンベロープなしの裸の整数であること");
    assert_eq!(
        provider.recorded_calls(),
        vec![format!(
            "count_history_tasks({{\"processInstanceId\":\"P1\"}}, user={TEST_USER_ID}, locale=None)"
        )]
    );
}

#[tokio::test]
async fn test_件数取得でも未認証は401() {
    let provider = Arc::new(StubProvider::with_count(3));
    let sut = create_test_app(provider.clone(), StubSessionStore::no_session());

    let response = sut
        .oneshot(count_request(serde_json::json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(provider.recorded_calls().is_empty());
}

#[tokio::test]
async fn test_件数0でも404にせず0を返す() {
    let provider = Arc::new(StubProvider::with_count(0));
    let sut = create_test_app(provider, StubSessionStore::with_grants(Vec::new()));

    let response = sut
        .oneshot(count_request(serde_json::json!({"taskName": "存在しない"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"0");
}

#[tokio::test]
async fn test_件数取得のエンジンエラーは500() {
    let provider = Arc::new(StubProvider::with_count_error(BpmProviderError::Network(
        "接続失敗".to_string(),
    )));
    let sut = create_test_app(provider, StubSessionStore::with_grants(Vec::new()));

    let response = sut
        .oneshot(count_request(serde_json::json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
