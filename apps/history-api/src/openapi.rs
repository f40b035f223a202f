//! # OpenAPI 仕様定義
//!
//! History API の OpenAPI 仕様をビルダー API で組み立てる。
//! `ApiDoc::openapi()` で OpenAPI ドキュメントを取得できる。
//!
//! ## 設計方針
//!
//! - パス定義は [`crate::app_builder::task_history_routes`] のルート表と
//!   1:1 に対応させる。ハンドラにマクロ注釈は付けず、ドキュメントは
//!   この 1 ファイルに集約する
//! - パラメータ名は公開 API の表記（camelCase）に合わせる
//! - スキーマはレスポンス型の `ToSchema` 実装から取得する

use utoipa::{
    PartialSchema,
    openapi::{
        ComponentsBuilder,
        ContentBuilder,
        HttpMethod,
        OpenApiBuilder,
        PathItem,
        PathsBuilder,
        Ref,
        Required,
        info::InfoBuilder,
        path::{OperationBuilder, ParameterBuilder, ParameterIn},
        request_body::RequestBodyBuilder,
        schema::{ArrayBuilder, ObjectBuilder, Type},
        security::{ApiKey, ApiKeyValue, SecurityRequirement, SecurityScheme},
        tag::TagBuilder,
    },
};

use crate::provider::{TaskHistoryDto, VariableHistoryDto};

/// ドキュメント上のベースパス
///
/// 実際のベースパスは `SERVICES_BASE_PATH` で変更できるが、
/// 生成ドキュメントには既定値を使用する。
const DOC_BASE_PATH: &str = "/services/v1";

/// OpenAPI ドキュメントのエントリポイント
pub struct ApiDoc;

impl ApiDoc {
    /// OpenAPI ドキュメントを組み立てる
    pub fn openapi() -> utoipa::openapi::OpenApi {
        let paths = PathsBuilder::new()
            .path("/health", PathItem::new(HttpMethod::Get, health_op()))
            .path(
                "/health/ready",
                PathItem::new(HttpMethod::Get, readiness_op()),
            )
            .path(
                format!("{DOC_BASE_PATH}/task-history/{{activityInstanceId}}/variables"),
                PathItem::new(HttpMethod::Get, get_activity_variables_op()),
            )
            .path(
                format!("{DOC_BASE_PATH}/task-history/by-process-key"),
                PathItem::new(HttpMethod::Get, find_by_definition_key_op()),
            )
            .path(
                format!("{DOC_BASE_PATH}/task-history/by-process-instance/{{processInstanceId}}"),
                PathItem::new(HttpMethod::Get, find_by_process_instance_op()),
            )
            .path(
                format!("{DOC_BASE_PATH}/task-history/by-task-id/{{taskId}}"),
                PathItem::new(HttpMethod::Get, find_by_task_id_op()),
            )
            .path(
                format!("{DOC_BASE_PATH}/task-history/count"),
                PathItem::new(HttpMethod::Post, count_op()),
            );

        let components = ComponentsBuilder::new()
            .schema("TaskHistoryDto", TaskHistoryDto::schema())
            .schema("VariableHistoryDto", VariableHistoryDto::schema())
            .schema("ErrorResponse", rirekiflow_shared::ErrorResponse::schema())
            .schema("HealthResponse", rirekiflow_shared::HealthResponse::schema())
            .schema(
                "ReadinessResponse",
                rirekiflow_shared::ReadinessResponse::schema(),
            )
            .schema(
                "ReadinessStatus",
                rirekiflow_shared::ReadinessStatus::schema(),
            )
            .schema(
                "ReadinessChecks",
                rirekiflow_shared::ReadinessChecks::schema(),
            )
            .schema("CheckStatus", rirekiflow_shared::CheckStatus::schema())
            .security_scheme(
                "session_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("session_id"))),
            )
            .build();

        OpenApiBuilder::new()
            .info(
                InfoBuilder::new()
                    .title("RirekiFlow History API")
                    .version(env!("CARGO_PKG_VERSION"))
                    .description(Some(
                        "BPM エンジンの履歴タスクを参照する REST アダプタ API",
                    ))
                    .build(),
            )
            .paths(paths)
            .components(Some(components))
            .tags(Some([
                TagBuilder::new()
                    .name("health")
                    .description(Some("ヘルスチェック"))
                    .build(),
                TagBuilder::new()
                    .name("task-history")
                    .description(Some("履歴タスク"))
                    .build(),
            ]))
            .build()
    }
}

// --- 共通部品 ---

/// Cookie セッション認証の要求
fn session_security() -> SecurityRequirement {
    SecurityRequirement::new("session_auth", Vec::<String>::new())
}

/// 文字列型のパスパラメータ
fn string_path_param(name: &str, description: &str) -> ParameterBuilder {
    ParameterBuilder::new()
        .name(name)
        .parameter_in(ParameterIn::Path)
        .required(Required::True)
        .description(Some(description))
        .schema(Some(ObjectBuilder::new().schema_type(Type::String)))
}

/// 文字列型のクエリパラメータ（必須）
fn string_query_param(name: &str, description: &str) -> ParameterBuilder {
    ParameterBuilder::new()
        .name(name)
        .parameter_in(ParameterIn::Query)
        .required(Required::True)
        .description(Some(description))
        .schema(Some(ObjectBuilder::new().schema_type(Type::String)))
}

/// 指定スキーマの JSON レスポンス
fn json_response(
    description: &str,
    schema: impl Into<utoipa::openapi::RefOr<utoipa::openapi::schema::Schema>>,
) -> utoipa::openapi::Response {
    utoipa::openapi::ResponseBuilder::new()
        .description(description)
        .content(
            "application/json",
            ContentBuilder::new().schema(Some(schema)).build(),
        )
        .build()
}

/// `ErrorResponse` スキーマを参照するエラーレスポンス
fn error_response(description: &str) -> utoipa::openapi::Response {
    json_response(description, Ref::from_schema_name("ErrorResponse"))
}

/// `TaskHistoryDto` の配列レスポンス（200）
fn task_list_response() -> utoipa::openapi::Response {
    json_response(
        "該当する履歴タスクの一覧",
        ArrayBuilder::new().items(Ref::from_schema_name("TaskHistoryDto")),
    )
}

// --- ヘルスチェック ---

fn health_op() -> OperationBuilder {
    OperationBuilder::new()
        .tag("health")
        .operation_id(Some("healthCheck"))
        .summary(Some("Liveness Check"))
        .response(
            "200",
            json_response("サーバー稼働中", Ref::from_schema_name("HealthResponse")),
        )
}

fn readiness_op() -> OperationBuilder {
    OperationBuilder::new()
        .tag("health")
        .operation_id(Some("readinessCheck"))
        .summary(Some("Readiness Check"))
        .description(Some("Redis と BPM エンジンの接続状態を確認する"))
        .response(
            "200",
            json_response(
                "全依存サービス稼働中",
                Ref::from_schema_name("ReadinessResponse"),
            ),
        )
        .response(
            "503",
            json_response(
                "一部の依存サービスが利用不可",
                Ref::from_schema_name("ReadinessResponse"),
            ),
        )
}

// --- 履歴タスク ---

fn get_activity_variables_op() -> OperationBuilder {
    OperationBuilder::new()
        .tag("task-history")
        .operation_id(Some("getActivityVariables"))
        .summary(Some("アクティビティの履歴変数取得"))
        .description(Some(
            "アクティビティインスタンスに紐づく履歴変数の一覧を返す。\
             変数が 1 件もない場合は空リストを返す",
        ))
        .parameter(string_path_param(
            "activityInstanceId",
            "アクティビティインスタンス ID",
        ))
        .response(
            "200",
            json_response(
                "履歴変数の一覧",
                ArrayBuilder::new().items(Ref::from_schema_name("VariableHistoryDto")),
            ),
        )
        .response("400", error_response("バリデーションエラー"))
        .response("401", error_response("認証エラー"))
        .response("403", error_response("権限不足"))
        .response(
            "404",
            error_response("アクティビティインスタンスが見つからない"),
        )
        .security(session_security())
}

fn find_by_definition_key_op() -> OperationBuilder {
    OperationBuilder::new()
        .tag("task-history")
        .operation_id(Some("findTasksByDefinitionKey"))
        .summary(Some("タスク定義キーで履歴タスク検索"))
        .description(Some(
            "タスク定義キーとプロセスインスタンス ID の両方に一致する履歴タスクを返す",
        ))
        .parameter(string_query_param("taskDefinitionKey", "タスク定義キー"))
        .parameter(string_query_param(
            "processInstanceId",
            "プロセスインスタンス ID",
        ))
        .response("200", task_list_response())
        .response("400", error_response("バリデーションエラー"))
        .response("401", error_response("認証エラー"))
        .response("403", error_response("権限不足"))
        .response("404", error_response("該当する履歴タスクが見つからない"))
        .security(session_security())
}

fn find_by_process_instance_op() -> OperationBuilder {
    OperationBuilder::new()
        .tag("task-history")
        .operation_id(Some("findTasksByProcessInstance"))
        .summary(Some("プロセスインスタンスで履歴タスク検索"))
        .parameter(string_path_param(
            "processInstanceId",
            "プロセスインスタンス ID",
        ))
        .response("200", task_list_response())
        .response("400", error_response("バリデーションエラー"))
        .response("401", error_response("認証エラー"))
        .response("403", error_response("権限不足"))
        .response("404", error_response("該当する履歴タスクが見つからない"))
        .security(session_security())
}

fn find_by_task_id_op() -> OperationBuilder {
    OperationBuilder::new()
        .tag("task-history")
        .operation_id(Some("findTasksByTaskId"))
        .summary(Some("タスク ID で履歴タスク検索"))
        .description(Some("同一タスクの履歴エントリが複数ありうるためリストで返す"))
        .parameter(string_path_param("taskId", "タスク ID"))
        .response("200", task_list_response())
        .response("400", error_response("バリデーションエラー"))
        .response("401", error_response("認証エラー"))
        .response("403", error_response("権限不足"))
        .response("404", error_response("該当する履歴タスクが見つからない"))
        .security(session_security())
}

fn count_op() -> OperationBuilder {
    OperationBuilder::new()
        .tag("task-history")
        .operation_id(Some("countTaskHistory"))
        .summary(Some("履歴タスク件数取得"))
        .description(Some(
            "フィルタ条件に一致する履歴タスクの件数を裸の整数で返す。\
             該当 0 件でも 404 にはせず 0 を返す。権限ゲートは適用されない",
        ))
        .request_body(Some(
            RequestBodyBuilder::new()
                .description(Some(
                    "エンジンにそのまま渡される検索フィルタ（任意の JSON オブジェクト）",
                ))
                .required(Some(Required::True))
                .content(
                    "application/json",
                    ContentBuilder::new()
                        .schema(Some(ObjectBuilder::new().schema_type(Type::Object)))
                        .build(),
                )
                .build(),
        ))
        .response(
            "200",
            json_response("該当件数", ObjectBuilder::new().schema_type(Type::Integer)),
        )
        .response("400", error_response("リクエストボディが不正"))
        .response("401", error_response("認証エラー"))
        .security(session_security())
}
