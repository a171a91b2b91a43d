use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::analytics::QueryTiming;
use crate::db::SchemaMap;
use crate::error::QueryError;
use crate::service::{QueryOutcome, TranslationRequest};
use crate::web::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ColumnsParams {
    pub database: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DatabasesResponse {
    pub databases: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ColumnsResponse {
    pub columns: SchemaMap,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: String,
    pub uptime_seconds: i64,
    pub analytics: Vec<QueryTiming>,
}

/// JSON error body with its HTTP status.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: Value,
}

impl ApiError {
    fn bad_request(message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: json!({ "error": message }),
        }
    }

    /// Server-side failures echo the question and database back to the caller.
    fn with_request(err: QueryError, request: &TranslationRequest) -> Self {
        let status = err.status_code();
        let body = if err.is_client_error() {
            json!({ "error": err.to_string() })
        } else {
            json!({
                "error": err.to_string(),
                "query": request.query,
                "database": request.database,
            })
        };
        Self { status, body }
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        Self {
            status: err.status_code(),
            body: json!({ "error": err.to_string() }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

// GET /databases
pub async fn list_databases(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DatabasesResponse>, ApiError> {
    let databases = state.query_service.list_databases().await.map_err(|e| {
        error!("Database fetch error: {}", e);
        ApiError::from(e)
    })?;

    Ok(Json(DatabasesResponse { databases }))
}

// GET /columns?database=NAME
pub async fn get_columns(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ColumnsParams>,
) -> Result<Json<ColumnsResponse>, ApiError> {
    let database = match params.database.as_deref() {
        Some(name) if !name.is_empty() => name,
        _ => return Err(ApiError::bad_request("Database name required")),
    };

    let columns = state.query_service.table_info(database).await.map_err(|e| {
        error!("Column fetch error for database '{}': {}", database, e);
        ApiError::from(e)
    })?;

    Ok(Json(ColumnsResponse { columns }))
}

// POST /query
pub async fn handle_query(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TranslationRequest>, JsonRejection>,
) -> Result<Json<QueryOutcome>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected query body: {}", rejection.body_text());
        ApiError::bad_request(&rejection.body_text())
    })?;

    let started = Instant::now();
    let outcome = state
        .query_service
        .run(&request)
        .await
        .map_err(|e| ApiError::with_request(e, &request))?;

    let elapsed = started.elapsed();
    state.analytics.track(&request.query, elapsed);

    info!(
        "Answered query '{}' on '{}' with {} rows in {:?}",
        request.query,
        request.database,
        outcome.results.len(),
        elapsed
    );
    Ok(Json(outcome))
}

// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    let uptime = chrono::Utc::now()
        .signed_duration_since(state.startup_time)
        .num_seconds();

    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime,
        analytics: state.analytics.snapshot(),
    })
}
