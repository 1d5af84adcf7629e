use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use docsite_core::builds;
use docsite_core::release::{NewRelease, Release};
use serde_json::{json, Value};

use crate::auth::Admin;
use crate::error::ApiResult;
use crate::state::AppState;

/// Version switcher and release routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/versions", get(list_versions))
        .route("/v1/versions/{version}/languages", get(languages))
        .route("/v1/releases", get(list_releases).post(create_release))
}

/// Versions with a built tree for the default language, oldest first,
/// then `dev`.
async fn list_versions(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let site = state.site();
    let versions = builds::all_doc_versions(&site.build_root, &site.default_language).await?;
    Ok(Json(json!({ "versions": versions })))
}

async fn languages(
    State(state): State<AppState>,
    Path(version): Path<String>,
) -> ApiResult<Json<Value>> {
    let languages = state
        .doc_releases()
        .get_available_languages_by_version(&version)
        .await?;
    Ok(Json(json!({ "version": version, "languages": languages })))
}

async fn list_releases(State(state): State<AppState>) -> ApiResult<Json<Vec<Release>>> {
    Ok(Json(state.releases().list().await?))
}

/// Record a release. Creating a dated micro release closes the support
/// window of the earlier ones in its series.
async fn create_release(
    _admin: Admin,
    State(state): State<AppState>,
    Json(new): Json<NewRelease>,
) -> ApiResult<Json<Release>> {
    Ok(Json(state.releases().create(&new).await?))
}
