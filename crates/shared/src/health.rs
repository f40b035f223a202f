//! # ヘルスチェックのレスポンス型
//!
//! liveness / readiness エンドポイントのレスポンス型。
//! 依存先は Redis（セッションストア）と BPM エンジンの 2 つで固定のため、
//! `checks` は名前付きフィールドの構造体で表現する。

use serde::{Deserialize, Serialize};

/// Liveness Check レスポンス
///
/// ```
/// use rirekiflow_shared::HealthResponse;
///
/// let response = HealthResponse {
///     status:  "healthy".to_string(),
///     version: env!("CARGO_PKG_VERSION").to_string(),
/// };
/// assert!(!response.version.is_empty());
/// ```
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthResponse {
    /// 稼働状態（`"healthy"` 固定）
    pub status:  String,
    /// ビルド時の `CARGO_PKG_VERSION`
    pub version: String,
}

/// 依存サービス単体の疎通結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum CheckStatus {
    /// 応答あり
    Ok,
    /// 応答なし、またはエラー応答
    Error,
}

/// トラフィックを受けられる状態かどうか
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum ReadinessStatus {
    /// 依存サービスがすべて応答した
    Ready,
    /// いずれかの依存サービスが応答しない
    NotReady,
}

/// 依存サービスごとのチェック結果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ReadinessChecks {
    /// セッションストア（Redis）への疎通
    pub redis:      CheckStatus,
    /// BPM エンジン REST API への疎通
    pub bpm_engine: CheckStatus,
}

impl ReadinessChecks {
    /// 全チェックが成功しているか
    pub fn all_ok(&self) -> bool {
        matches!(self.redis, CheckStatus::Ok) && matches!(self.bpm_engine, CheckStatus::Ok)
    }
}

/// Readiness Check レスポンス。全体判定と内訳を返す
///
/// ```
/// use rirekiflow_shared::{CheckStatus, ReadinessChecks, ReadinessResponse, ReadinessStatus};
///
/// let response = ReadinessResponse {
///     status: ReadinessStatus::Ready,
///     checks: ReadinessChecks {
///         redis:      CheckStatus::Ok,
///         bpm_engine: CheckStatus::Ok,
///     },
/// };
/// assert!(response.checks.all_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ReadinessResponse {
    /// 全体判定
    pub status: ReadinessStatus,
    /// 依存サービスごとのチェック結果
    pub checks: ReadinessChecks,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checks(redis: CheckStatus, bpm_engine: CheckStatus) -> ReadinessChecks {
        ReadinessChecks { redis, bpm_engine }
    }

    #[test]
    fn test_health_responseのserialize結果() {
        let response = HealthResponse {
            status:  "healthy".to_string(),
            version: "0.1.0".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({
                "status": "healthy",
                "version": "0.1.0"
            })
        );
    }

    #[test]
    fn test_check_statusは小文字でserializeされる() {
        assert_eq!(
            serde_json::to_value(CheckStatus::Ok).unwrap(),
            serde_json::json!("ok")
        );
        assert_eq!(
            serde_json::to_value(CheckStatus::Error).unwrap(),
            serde_json::json!("error")
        );
    }

    #[test]
    fn test_readiness_statusはsnake_caseでserializeされる() {
        assert_eq!(
            serde_json::to_value(ReadinessStatus::Ready).unwrap(),
            serde_json::json!("ready")
        );
        assert_eq!(
            serde_json::to_value(ReadinessStatus::NotReady).unwrap(),
            serde_json::json!("not_ready")
        );
    }

    #[test]
    fn test_all_ok_は両チェック成功でのみtrue() {
        assert!(checks(CheckStatus::Ok, CheckStatus::Ok).all_ok());
        assert!(!checks(CheckStatus::Error, CheckStatus::Ok).all_ok());
        assert!(!checks(CheckStatus::Ok, CheckStatus::Error).all_ok());
        assert!(!checks(CheckStatus::Error, CheckStatus::Error).all_ok());
    }

    #[test]
    fn test_ready時のjson形状() {
        let response = ReadinessResponse {
            status: ReadinessStatus::Ready,
            checks: checks(CheckStatus::Ok, CheckStatus::Ok),
        };
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "status": "ready",
                "checks": { "redis": "ok", "bpm_engine": "ok" }
            })
        );
    }

    #[test]
    fn test_not_ready時のjson形状() {
        let response = ReadinessResponse {
            status: ReadinessStatus::NotReady,
            checks: checks(CheckStatus::Ok, CheckStatus::Error),
        };
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["status"], "not_ready");
        assert_eq!(json["checks"]["redis"], "ok");
        assert_eq!(json["checks"]["bpm_engine"], "error");
    }
}

#[cfg(all(test, feature = "openapi"))]
mod openapi_tests {
    use utoipa::PartialSchema;

    use super::*;

    fn as_object(
        schema: utoipa::openapi::RefOr<utoipa::openapi::Schema>,
    ) -> utoipa::openapi::Object {
        let utoipa::openapi::RefOr::T(utoipa::openapi::Schema::Object(obj)) = schema else {
            panic!("expected inline object schema");
        };
        obj
    }

    #[test]
    fn test_health_responseのスキーマにstatusとversionが載る() {
        let obj = as_object(HealthResponse::schema());
        assert!(obj.properties.contains_key("status"));
        assert!(obj.properties.contains_key("version"));
    }

    #[test]
    fn test_readiness_responseのスキーマにstatusとchecksが載る() {
        let obj = as_object(ReadinessResponse::schema());
        assert!(obj.properties.contains_key("status"));
        assert!(obj.properties.contains_key("checks"));
    }

    #[test]
    fn test_readiness_checksのスキーマに依存サービス名が載る() {
        let obj = as_object(ReadinessChecks::schema());
        assert!(obj.properties.contains_key("redis"));
        assert!(obj.properties.contains_key("bpm_engine"));
    }
}
