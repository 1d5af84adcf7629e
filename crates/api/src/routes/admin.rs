use axum::{extract::State, routing::post, Json, Router};
use docsite_core::events::DocsEvent;
use serde_json::{json, Value};

use crate::auth::Admin;
use crate::error::ApiResult;
use crate::state::AppState;

/// Search index maintenance routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/search/update", post(search_update))
        .route("/v1/search/reset", post(search_reset))
}

/// Rebuild every document's search vector.
async fn search_update(_admin: Admin, State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let count = state.documents().search_update().await?;
    state.event_bus().publish(DocsEvent::search_index_updated(count));
    Ok(Json(json!({ "count": count })))
}

/// Drop every document's search vector.
async fn search_reset(_admin: Admin, State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let count = state.documents().search_reset().await?;
    state.event_bus().publish(DocsEvent::search_index_reset(count));
    Ok(Json(json!({ "count": count })))
}
