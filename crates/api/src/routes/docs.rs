use axum::{
    extract::{DefaultBodyLimit, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use docsite_core::doc_release::{DocumentRelease, ReleaseStatus, DEV_VERSION};
use docsite_core::document::{Breadcrumb, PageRecord, SearchHit, SyncReport};
use docsite_core::events::types::ReleaseSyncedEvent;
use docsite_core::events::DocsEvent;
use docsite_core::exclusions::Exclusions;
use docsite_core::CoreError;
use serde::{Deserialize, Serialize};

use crate::auth::Admin;
use crate::error::ApiResult;
use crate::state::AppState;

/// Results per page when the client does not ask for a size.
const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;

/// A full build of one release can be large.
pub(crate) const SYNC_BODY_LIMIT: usize = 64 * 1024 * 1024;

/// Docs release, search and sync routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/docs/{lang}", get(current_release))
        .route(
            "/v1/docs/{lang}/{version}",
            get(release_info).post(create_release_docs),
        )
        .route("/v1/docs/{lang}/{version}/search", get(search))
        .route(
            "/v1/docs/{lang}/{version}/sync",
            post(sync).layer(DefaultBodyLimit::max(SYNC_BODY_LIMIT)),
        )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseInfo {
    pub lang: String,
    pub version: String,
    pub is_default: bool,
    pub status: ReleaseStatus,
    pub url: String,
    pub scm_url: String,
    pub release_date: Option<NaiveDate>,
    /// End of life of this exact release.
    pub eol_date: Option<NaiveDate>,
    /// End of life of the feature series, i.e. of its latest patch release.
    pub series_eol_date: Option<NaiveDate>,
    pub is_lts: bool,
}

impl ReleaseInfo {
    fn new(release: &DocumentRelease, scm_base: &str) -> Self {
        Self {
            lang: release.lang.clone(),
            version: release.version().to_string(),
            is_default: release.is_default,
            status: release.status(),
            url: release.absolute_url(),
            scm_url: release.scm_url(scm_base),
            release_date: release.release.as_ref().and_then(|r| r.date),
            eol_date: release.release.as_ref().and_then(|r| r.eol_date),
            series_eol_date: release.series_eol_date,
            is_lts: release.release.as_ref().is_some_and(|r| r.is_lts),
        }
    }
}

/// The docs served for a language when no version is given.
async fn current_release(
    State(state): State<AppState>,
    Path(lang): Path<String>,
) -> ApiResult<Json<ReleaseInfo>> {
    let release = state.doc_releases().current(&lang).await?;
    Ok(Json(ReleaseInfo::new(&release, &state.site().scm_url)))
}

async fn release_info(
    State(state): State<AppState>,
    Path((lang, version)): Path<(String, String)>,
) -> ApiResult<Json<ReleaseInfo>> {
    let release = state
        .doc_releases()
        .get_by_version_and_lang(&version, &lang)
        .await?;
    Ok(Json(ReleaseInfo::new(&release, &state.site().scm_url)))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateReleaseDocs {
    #[serde(default)]
    is_default: bool,
}

/// Open a docs scope for a language and an existing release (or `dev`).
async fn create_release_docs(
    _admin: Admin,
    State(state): State<AppState>,
    Path((lang, version)): Path<(String, String)>,
    Json(body): Json<CreateReleaseDocs>,
) -> ApiResult<Json<ReleaseInfo>> {
    let release_id = if version == DEV_VERSION {
        None
    } else {
        Some(state.releases().get_by_version(&version).await?.id)
    };
    let release = state
        .doc_releases()
        .create(&lang, release_id, body.is_default)
        .await?;
    Ok(Json(ReleaseInfo::new(&release, &state.site().scm_url)))
}

#[derive(Debug, Default, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
    limit: Option<u32>,
    #[serde(default)]
    offset: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub path: String,
    pub title: String,
    pub url: String,
    pub rank: f64,
    pub headline: String,
    pub highlight: String,
    pub breadcrumbs: Vec<Breadcrumb>,
}

impl SearchResult {
    fn new(hit: SearchHit, release: &DocumentRelease) -> Self {
        Self {
            url: hit.document.absolute_url(release),
            breadcrumbs: hit.breadcrumbs().to_vec(),
            path: hit.document.path,
            title: hit.document.title,
            rank: hit.rank,
            headline: hit.headline,
            highlight: hit.highlight,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    pub results: Vec<SearchResult>,
}

async fn search(
    State(state): State<AppState>,
    Path((lang, version)): Path<(String, String)>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<SearchResponse>> {
    let release = state
        .doc_releases()
        .get_by_version_and_lang(&version, &lang)
        .await?;
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

    let documents = state.documents();
    let count = documents.search(&params.q, &release).count().await?;
    let hits = documents
        .search(&params.q, &release)
        .limit(limit)
        .offset(params.offset)
        .fetch_all()
        .await?;

    Ok(Json(SearchResponse {
        query: params.q,
        count,
        results: hits
            .into_iter()
            .map(|hit| SearchResult::new(hit, &release))
            .collect(),
    }))
}

#[derive(Debug, Deserialize)]
struct SyncRequest {
    pages: Vec<PageRecord>,
}

/// Replace a release's documents with a freshly built set of pages.
async fn sync(
    _admin: Admin,
    State(state): State<AppState>,
    Path((lang, version)): Path<(String, String)>,
    Json(body): Json<SyncRequest>,
) -> ApiResult<Json<SyncReport>> {
    let release = state
        .doc_releases()
        .get_by_version_and_lang(&version, &lang)
        .await?;
    let exclusions = Exclusions::load(&state.site().exclusions_path)
        .await
        .map_err(CoreError::from)?;

    let report = state
        .documents()
        .sync_to_db(&release, &body.pages, &exclusions)
        .await?;

    state
        .event_bus()
        .publish(DocsEvent::ReleaseSynced(ReleaseSyncedEvent {
            sync_id: report.sync_id,
            lang: release.lang.clone(),
            version: release.version().to_string(),
            created: report.created,
            skipped: report.skipped_empty + report.skipped_excluded,
            timestamp: Utc::now(),
        }));
    Ok(Json(report))
}
