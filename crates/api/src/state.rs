use std::sync::Arc;

use docsite_core::config::SiteConfig;
use docsite_core::doc_release::DocumentReleaseStore;
use docsite_core::document::DocumentStore;
use docsite_core::events::EventBus;
use docsite_core::release::ReleaseStore;
use sqlx::SqlitePool;

use crate::config::AppConfig;

/// Shared application state, passed to all handlers via Axum's `State` extractor.
/// Wrapped in `Arc` so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    pool: SqlitePool,
    config: AppConfig,
    site: SiteConfig,
    event_bus: EventBus,
    releases: ReleaseStore,
    doc_releases: DocumentReleaseStore,
    documents: DocumentStore,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: AppConfig, event_bus: EventBus) -> Self {
        let site = config.site_config();
        Self {
            inner: Arc::new(InnerState {
                releases: ReleaseStore::new(pool.clone()),
                doc_releases: DocumentReleaseStore::new(pool.clone()),
                documents: DocumentStore::new(pool.clone(), site.clone()),
                pool,
                config,
                site,
                event_bus,
            }),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn site(&self) -> &SiteConfig {
        &self.inner.site
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.inner.event_bus
    }

    pub fn releases(&self) -> &ReleaseStore {
        &self.inner.releases
    }

    pub fn doc_releases(&self) -> &DocumentReleaseStore {
        &self.inner.doc_releases
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.inner.documents
    }
}
