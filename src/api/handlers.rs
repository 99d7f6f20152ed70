//! API request handlers
//!
//! Handlers for all REST API endpoints.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::server::AppState;
use crate::core::{enrich, Dashboard, FilterOptions, ReplacementFilter};
use crate::error::{AuthError, HistoryError, HistoryResult};
use crate::excel::WorkbookLoader;
use crate::export::{to_csv_bytes, DEFAULT_CSV_NAME};
use crate::types::RawTables;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
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
}

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ApiResponse::err(message)))
}

impl From<AuthError> for (StatusCode, Json<ApiResponse<()>>) {
    fn from(e: AuthError) -> Self {
        api_error(StatusCode::UNAUTHORIZED, e.to_string())
    }
}

fn history_error(e: HistoryError) -> ApiError {
    let status = match e {
        HistoryError::Validation(_) => StatusCode::BAD_REQUEST,
        HistoryError::Auth(_) => StatusCode::UNAUTHORIZED,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    api_error(status, e.to_string())
}

/// Pull the bearer token out of the Authorization header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

/// Resolve the request's session, returning the token and username
fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(String, String), ApiError> {
    let token = bearer_token(headers).ok_or(AuthError::NotAuthenticated)?;
    let username = state.sessions.username(token)?;
    Ok((token.to_string(), username))
}

/// Run blocking workbook I/O off the async executor
async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> HistoryResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(history_error)
}

/// Filter selections from a request body; an empty body means "all"
fn filter_from_body(body: &Bytes) -> Result<ReplacementFilter, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ReplacementFilter::all());
    }
    serde_json::from_slice::<ReplacementFilter>(body)
        .map(ReplacementFilter::normalized)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, format!("Invalid filter: {}", e)))
}

fn load_tables(workbook: PathBuf) -> HistoryResult<RawTables> {
    Ok(WorkbookLoader::new(workbook).load()?)
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

impl EndpointInfo {
    fn new(path: &str, method: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_string(),
            description: description.to_string(),
        }
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = RootResponse {
        name: "Laptop History API Server".to_string(),
        version: state.version.clone(),
        description: "Laptop asset and part-replacement reporting".to_string(),
        endpoints: vec![
            EndpointInfo::new("/health", "GET", "Health check endpoint"),
            EndpointInfo::new("/version", "GET", "Get server version"),
            EndpointInfo::new("/api/v1/login", "POST", "Open a session"),
            EndpointInfo::new("/api/v1/logout", "POST", "End the current session"),
            EndpointInfo::new("/api/v1/session", "GET", "Show the logged-in user"),
            EndpointInfo::new("/api/v1/dashboard", "POST", "Filtered history, aggregations and charts"),
            EndpointInfo::new("/api/v1/options", "GET", "Available year, user and part filters"),
            EndpointInfo::new("/api/v1/refresh", "POST", "Reload the workbook"),
            EndpointInfo::new("/api/v1/export", "POST", "Download the filtered history as CSV"),
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
        features: ["dashboard", "options", "refresh", "export"]
            .iter()
            .map(|f| f.to_string())
            .collect(),
    }))
}

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
}

/// POST /api/v1/login - Open a session
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let token = state
        .sessions
        .login(state.verifier.as_ref(), &req.username, &req.password)?;
    Ok(Json(ApiResponse::ok(LoginResponse {
        token,
        username: req.username,
    })))
}

/// Session response
#[derive(Serialize)]
pub struct SessionResponse {
    pub username: String,
    pub logged_in: bool,
}

/// POST /api/v1/logout - End the current session
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<SessionResponse>>, ApiError> {
    let (token, username) = authorize(&state, &headers)?;
    state.sessions.logout(&token);
    Ok(Json(ApiResponse::ok(SessionResponse {
        username,
        logged_in: false,
    })))
}

/// GET /api/v1/session - Who is logged in
pub async fn session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<SessionResponse>>, ApiError> {
    let (_, username) = authorize(&state, &headers)?;
    Ok(Json(ApiResponse::ok(SessionResponse {
        username,
        logged_in: true,
    })))
}

/// POST /api/v1/dashboard - Full dashboard view for the given filters
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ApiResponse<Dashboard>>, ApiError> {
    authorize(&state, &headers)?;
    let filter = filter_from_body(&body)?;
    let workbook = state.workbook.clone();

    let view = blocking(move || Dashboard::load(workbook, &filter)).await?;
    Ok(Json(ApiResponse::ok(view)))
}

/// GET /api/v1/options - Selector choices
pub async fn options(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<FilterOptions>>, ApiError> {
    authorize(&state, &headers)?;
    let workbook = state.workbook.clone();

    let options = blocking(move || {
        let tables = load_tables(workbook)?;
        Ok(FilterOptions::from_records(&enrich(&tables).records))
    })
    .await?;
    Ok(Json(ApiResponse::ok(options)))
}

/// Refresh response
#[derive(Serialize, Default)]
pub struct RefreshResponse {
    pub assets: usize,
    pub replacements: usize,
    pub orphaned: usize,
    pub unparsed_dates: usize,
    pub message: String,
}

/// POST /api/v1/refresh - Reload the workbook and report what was read
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<RefreshResponse>>, ApiError> {
    authorize(&state, &headers)?;
    let workbook = state.workbook.clone();

    let response = blocking(move || {
        let tables = load_tables(workbook)?;
        let report = enrich(&tables).report;
        Ok(RefreshResponse {
            assets: tables.assets.len(),
            replacements: tables.replacements.len(),
            orphaned: report.orphaned,
            unparsed_dates: report.unparsed_dates,
            message: "Workbook reloaded".to_string(),
        })
    })
    .await?;
    Ok(Json(ApiResponse::ok(response)))
}

/// POST /api/v1/export - Filtered history as a CSV download
pub async fn export_csv(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&state, &headers)?;
    let filter = filter_from_body(&body)?;
    let workbook = state.workbook.clone();

    let bytes = blocking(move || {
        let view = Dashboard::load(workbook, &filter)?;
        to_csv_bytes(&view.records)
    })
    .await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", DEFAULT_CSV_NAME),
            ),
        ],
        bytes,
    ))
}
