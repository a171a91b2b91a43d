use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

// JSON API consumed by the front end
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/databases", get(handlers::api::list_databases))
        .route("/columns", get(handlers::api::get_columns))
        .route("/query", post(handlers::api::handle_query))
        .route("/health", get(handlers::api::health))
}
