//! API request handlers
//!
//! Handlers for all REST API endpoints. Every payload travels inside the
//! standard envelope; rule-cache misses map to 404, precondition and
//! format problems to 400, collaborator failures to 500.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::RuleError;
use crate::service::PublishOutcome;
use crate::types::{PublishRequest, RepoRef, RuleDraft};

use super::server::AppState;

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }

    /// Failure that still carries a payload (e.g. the validation report
    /// that blocked a publish).
    pub fn err_with(data: T, message: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: Some(message.into()),
        }
    }
}

/// Map a core error onto the HTTP status it should travel with.
fn error_status(error: &RuleError) -> StatusCode {
    match error {
        RuleError::NotFound(_) => StatusCode::NOT_FOUND,
        RuleError::NoRepository
        | RuleError::EmptyCache
        | RuleError::UnsupportedFormat(_)
        | RuleError::TemplateFormat(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn fail(error: &RuleError) -> Response {
    (
        error_status(error),
        Json(ApiResponse::<()>::err(error.to_string())),
    )
        .into_response()
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

fn endpoint(path: &str, method: &str, description: &str) -> EndpointInfo {
    EndpointInfo {
        path: path.to_string(),
        method: method.to_string(),
        description: description.to_string(),
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = RootResponse {
        name: "Ruleforge API Server".to_string(),
        version: state.version.clone(),
        description: "HTTP API for editing and publishing decision-table rules".to_string(),
        endpoints: vec![
            endpoint("/health", "GET", "Health check endpoint"),
            endpoint("/version", "GET", "Get server version"),
            endpoint("/api/v1/rules", "GET", "List all cached rules"),
            endpoint("/api/v1/rules", "POST", "Create a rule"),
            endpoint("/api/v1/rules/{id}", "GET", "Get a rule by id"),
            endpoint("/api/v1/rules/{id}", "PUT", "Replace a rule by id"),
            endpoint("/api/v1/rules/{id}", "DELETE", "Delete a rule by id"),
            endpoint(
                "/api/v1/rules/fetch",
                "POST",
                "Fetch rules from a repository's decision table",
            ),
            endpoint(
                "/api/v1/rules/validate",
                "POST",
                "Validate current rules against the last-used template",
            ),
            endpoint(
                "/api/v1/rules/publish",
                "POST",
                "Write current rules back and push a branch",
            ),
            endpoint(
                "/api/v1/rules/pull-request",
                "POST",
                "Open a pull request for a pushed branch",
            ),
        ],
    };
    Json(ApiResponse::ok(response))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_message: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        uptime_message: "Server is running".to_string(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: vec![
            "rules".to_string(),
            "fetch".to_string(),
            "validate".to_string(),
            "publish".to_string(),
            "pull-request".to_string(),
        ],
    }))
}

/// GET /api/v1/rules - List cached rules
pub async fn list_rules(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut rules = state.service.store.list();
    rules.sort_by_key(|r| r.id);
    Json(ApiResponse::ok(rules))
}

/// GET /api/v1/rules/{id} - Get one rule
pub async fn get_rule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Response {
    match state.service.store.get(id) {
        Some(rule) => Json(ApiResponse::ok(rule)).into_response(),
        None => fail(&RuleError::NotFound(id)),
    }
}

/// POST /api/v1/rules - Create a rule
pub async fn create_rule(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<RuleDraft>,
) -> Response {
    let rule = state.service.store.create(draft);
    (StatusCode::CREATED, Json(ApiResponse::ok(rule))).into_response()
}

/// PUT /api/v1/rules/{id} - Replace a rule
pub async fn update_rule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(draft): Json<RuleDraft>,
) -> Response {
    match state.service.store.update(id, draft) {
        Some(rule) => Json(ApiResponse::ok(rule)).into_response(),
        None => fail(&RuleError::NotFound(id)),
    }
}

/// Delete response
#[derive(Serialize, Default)]
pub struct DeleteResponse {
    pub id: u64,
    pub deleted: bool,
}

/// DELETE /api/v1/rules/{id} - Delete a rule
pub async fn delete_rule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Response {
    if state.service.store.delete(id) {
        Json(ApiResponse::ok(DeleteResponse { id, deleted: true })).into_response()
    } else {
        fail(&RuleError::NotFound(id))
    }
}

/// POST /api/v1/rules/fetch - Fetch rules from a repository
pub async fn fetch_rules(
    State(state): State<Arc<AppState>>,
    Json(repo): Json<RepoRef>,
) -> Response {
    match state.service.fetch_rules(repo) {
        Ok(rules) => {
            info!("fetched {} rules from repository", rules.len());
            Json(ApiResponse::ok(rules)).into_response()
        }
        Err(e) => {
            warn!("fetch failed: {}", e);
            fail(&e)
        }
    }
}

/// POST /api/v1/rules/validate - Validate against the last-used template
pub async fn validate_rules(State(state): State<Arc<AppState>>) -> Response {
    match state.service.validate_current() {
        Ok(report) => Json(ApiResponse::ok(report)).into_response(),
        Err(e) => fail(&e),
    }
}

/// Publish response
#[derive(Serialize, Default)]
pub struct PublishResponse {
    pub message: String,
    pub branch: String,
    pub warnings: Vec<String>,
}

/// POST /api/v1/rules/publish - Write rules back and push a branch
pub async fn publish_rules(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PublishRequest>,
) -> Response {
    match state.service.publish(&request) {
        Ok(PublishOutcome::Pushed { branch, warnings }) => {
            info!("pushed rules to branch {}", branch);
            Json(ApiResponse::ok(PublishResponse {
                message: "Successfully pushed to branch".to_string(),
                branch,
                warnings,
            }))
            .into_response()
        }
        Ok(PublishOutcome::Blocked(report)) => {
            warn!("publish blocked by {} validation errors", report.errors.len());
            (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::err_with(
                    report,
                    "validation errors blocked the publish",
                )),
            )
                .into_response()
        }
        Err(e) => {
            warn!("publish failed: {}", e);
            fail(&e)
        }
    }
}

/// Pull request response
#[derive(Serialize, Default)]
pub struct PullRequestResponse {
    pub message: String,
    pub pr_url: String,
}

/// POST /api/v1/rules/pull-request - Open a pull request
pub async fn create_pull_request(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PublishRequest>,
) -> Response {
    let branch = match request.branch_name.as_deref() {
        Some(branch) if !branch.is_empty() => branch.to_string(),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<()>::err("branch name is required")),
            )
                .into_response()
        }
    };
    let title = match request.title.as_deref() {
        Some(title) if !title.is_empty() => title.to_string(),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<()>::err("pull request title is required")),
            )
                .into_response()
        }
    };

    match state.service.open_pull_request(&request, &branch, &title) {
        Ok(pr_url) => Json(ApiResponse::ok(PullRequestResponse {
            message: "Pull request created successfully".to_string(),
            pr_url,
        }))
        .into_response(),
        Err(e) => {
            warn!("pull request failed: {}", e);
            fail(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== ApiResponse Tests ====================

    #[test]
    fn test_api_response_ok_creates_success_response() {
        let response: ApiResponse<String> = ApiResponse::ok("test data".to_string());

        assert!(response.success);
        assert_eq!(response.data, Some("test data".to_string()));
        assert!(response.error.is_none());
        // Verify UUID format (8-4-4-4-12)
        assert_eq!(response.request_id.len(), 36);
    }

    #[test]
    fn test_api_response_err_creates_error_response() {
        let response: ApiResponse<String> = ApiResponse::err("Something went wrong");

        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.error, Some("Something went wrong".to_string()));
    }

    #[test]
    fn test_api_response_err_with_keeps_payload() {
        let response = ApiResponse::err_with("payload".to_string(), "blocked");

        assert!(!response.success);
        assert_eq!(response.data, Some("payload".to_string()));
        assert_eq!(response.error, Some("blocked".to_string()));
    }

    #[test]
    fn test_api_response_request_id_is_unique() {
        let response1: ApiResponse<String> = ApiResponse::ok("test1".to_string());
        let response2: ApiResponse<String> = ApiResponse::ok("test2".to_string());

        assert_ne!(response1.request_id, response2.request_id);
    }

    #[test]
    fn test_api_response_serializes_without_none_fields() {
        let response: ApiResponse<String> = ApiResponse::ok("data".to_string());
        let json = serde_json::to_string(&response).unwrap();

        assert!(!json.contains("\"error\""));
        assert!(json.contains("\"success\":true"));
        assert!(json.contains("\"data\":\"data\""));
    }

    // ==================== Status Mapping Tests ====================

    #[test]
    fn test_not_found_maps_to_404() {
        assert_eq!(error_status(&RuleError::NotFound(3)), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_preconditions_map_to_400() {
        assert_eq!(
            error_status(&RuleError::NoRepository),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(error_status(&RuleError::EmptyCache), StatusCode::BAD_REQUEST);
        assert_eq!(
            error_status(&RuleError::UnsupportedFormat("csv".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(&RuleError::TemplateFormat("no markers".to_string())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_collaborator_failures_map_to_500() {
        assert_eq!(
            error_status(&RuleError::Git("clone failed".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            error_status(&RuleError::Compiler("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    // ==================== Response Struct Tests ====================

    #[test]
    fn test_publish_response_serialize() {
        let response = PublishResponse {
            message: "Successfully pushed to branch".to_string(),
            branch: "rules/123-update".to_string(),
            warnings: vec!["no rule definitions found in compiled output".to_string()],
        };
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"branch\":\"rules/123-update\""));
        assert!(json.contains("no rule definitions"));
    }

    #[test]
    fn test_delete_response_serialize() {
        let response = DeleteResponse { id: 4, deleted: true };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"id\":4"));
        assert!(json.contains("\"deleted\":true"));
    }

    #[test]
    fn test_health_response_serialize() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            uptime_message: "Server is running".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"status\":\"healthy\""));
    }

    // ==================== Request Deserialization Tests ====================

    #[test]
    fn test_repo_ref_deserialize() {
        let json = r#"{"url": "https://github.com/acme/rules.git",
                       "branch": "main",
                       "file_path": "tables/discount.xlsx",
                       "username": "bot",
                       "token": "t0ken"}"#;
        let repo: RepoRef = serde_json::from_str(json).unwrap();
        assert_eq!(repo.file_path, "tables/discount.xlsx");
        assert_eq!(repo.username.as_deref(), Some("bot"));
    }

    #[test]
    fn test_publish_request_deserialize_minimal() {
        let json = r#"{"repo": {"url": "https://github.com/acme/rules.git",
                                "branch": "main",
                                "file_path": "t.xlsx"}}"#;
        let request: PublishRequest = serde_json::from_str(json).unwrap();
        assert!(request.branch_name.is_none());
        assert!(request.commit_message.is_none());
        assert!(request.title.is_none());
    }
}
