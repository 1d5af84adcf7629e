use axum::{extract::State, routing::get, Json, Router};
use docsite_core::db;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/v1/ping", get(ping))
}

/// Database reachability plus the size of the search index and how many
/// listeners are attached to the event bus.
async fn health_check(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    db::ping(state.pool())
        .await
        .map_err(|e| ApiError::Internal(format!("database health check failed: {e}")))?;
    let indexed = state.documents().count_indexed().await?;

    Ok(Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "database": "connected",
        "indexedDocuments": indexed,
        "subscribers": state.event_bus().subscriber_count(),
    })))
}

async fn ping() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
