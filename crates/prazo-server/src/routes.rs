//! Route handlers.
//!
//! Every request is a stateless read-transform-return or find-then-write:
//! the handler opens a fresh store session, does its one read or write, and
//! answers. Nothing is shared between requests beyond the provider handle.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use prazo_core::reader::{self, project_sheet, task_sheet};
use prazo_core::{
    to_sheet_timestamp, update_schedule_dates, DateError, Record, StoreError, StoreProvider,
    UpdateError,
};

/// Names of the two source sheets.
#[derive(Clone, Debug)]
pub struct SheetNames {
    pub projects: String,
    pub tasks: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            projects: "PRINCIPAL".to_string(),
            tasks: "SUBTAREFA".to_string(),
        }
    }
}

/// Shared handler state: the session provider and the sheet names.
pub struct AppState<P: StoreProvider> {
    provider: Arc<P>,
    sheets: SheetNames,
}

impl<P: StoreProvider> AppState<P> {
    pub fn new(provider: P, sheets: SheetNames) -> Self {
        Self {
            provider: Arc::new(provider),
            sheets,
        }
    }
}

impl<P: StoreProvider> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            sheets: self.sheets.clone(),
        }
    }
}

/// Build the API router over any store provider.
pub fn build_router<P: StoreProvider>(state: AppState<P>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/api/projects", get(api_projects::<P>))
        .route("/api/gantt", get(api_gantt::<P>))
        .route("/api/gantt/:task_id", put(api_update_task::<P>))
        .route("/api/projects/:project_id", put(api_update_project::<P>))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ============================================================================
// Errors
// ============================================================================

/// Request failure, mapped to a JSON error response.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("identifier {0:?} not found")]
    NotFound(String),

    #[error(transparent)]
    InvalidDate(#[from] DateError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<UpdateError> for ApiError {
    fn from(err: UpdateError) -> Self {
        match err {
            UpdateError::NotFound(id) => ApiError::NotFound(id),
            UpdateError::Store(err) => ApiError::Store(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::InvalidDate(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Store(err) => {
                // Detail goes to the log, not to the client.
                error!(error = %err, "store request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "backing store request failed".to_string(),
                )
            }
        };
        (status, Json(json!({ "success": false, "error": message }))).into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn home() -> &'static str {
    "prazo server OK"
}

async fn api_projects<P: StoreProvider>(
    State(state): State<AppState<P>>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let store = state.provider.connect().await?;
    let records = reader::project_records(&store, &state.sheets.projects).await?;
    info!(count = records.len(), "listed project records");
    Ok(Json(records))
}

async fn api_gantt<P: StoreProvider>(
    State(state): State<AppState<P>>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let store = state.provider.connect().await?;
    let records =
        reader::task_records(&store, &state.sheets.projects, &state.sheets.tasks).await?;
    info!(count = records.len(), "listed task records");
    Ok(Json(records))
}

/// PUT body: optional wire timestamps; absent or empty fields clear the cell.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct UpdateDatesBody {
    start_date: Option<String>,
    end_date: Option<String>,
}

impl UpdateDatesBody {
    /// Convert both fields to the sheet's timestamp form.
    fn sheet_values(&self) -> Result<(String, String), DateError> {
        let start = to_sheet_timestamp(self.start_date.as_deref().unwrap_or(""))?;
        let end = to_sheet_timestamp(self.end_date.as_deref().unwrap_or(""))?;
        Ok((start, end))
    }
}

async fn api_update_task<P: StoreProvider>(
    State(state): State<AppState<P>>,
    Path(task_id): Path<String>,
    Json(body): Json<UpdateDatesBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (start, end) = body.sheet_values()?;
    let store = state.provider.connect().await?;
    update_schedule_dates(
        &store,
        &state.sheets.tasks,
        task_sheet::ID_SEARCH_COLUMN,
        &task_id,
        &[
            (task_sheet::START_WRITE_COLUMN, start),
            (task_sheet::END_WRITE_COLUMN, end),
        ],
    )
    .await?;
    info!(%task_id, "updated task schedule");
    Ok(Json(json!({ "success": true })))
}

async fn api_update_project<P: StoreProvider>(
    State(state): State<AppState<P>>,
    Path(project_id): Path<String>,
    Json(body): Json<UpdateDatesBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (start, end) = body.sheet_values()?;
    let store = state.provider.connect().await?;
    update_schedule_dates(
        &store,
        &state.sheets.projects,
        project_sheet::ID_SEARCH_COLUMN,
        &project_id,
        &[
            (project_sheet::START_WRITE_COLUMN, start),
            (project_sheet::END_WRITE_COLUMN, end),
        ],
    )
    .await?;
    info!(%project_id, "updated project schedule");
    Ok(Json(json!({ "success": true })))
}
