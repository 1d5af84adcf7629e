//! Turning built pages into the document set of a release.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::model::{Breadcrumb, DocumentMetadata, NewDocument};
use super::path::DocumentPath;
use super::validate::{validate_page_fields, SkipReason};
use crate::config::SiteConfig;
use crate::doc_release::DocumentRelease;
use crate::exclusions::Exclusions;
use crate::html;

/// Keys of a page record that are recomputed during sync.
const DERIVED_KEYS: [&str; 4] = ["breadcrumbs", "slug", "parents", "toc"];

/// A built page as produced by the documentation build (one `.fjson` file).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageRecord {
    /// Slash-separated page name, possibly ending in `/index`.
    pub current_page_name: String,
    /// Title HTML.
    #[serde(default)]
    pub title: Option<String>,
    /// Body HTML.
    #[serde(default)]
    pub body: Option<String>,
    /// Every other key of the page (`toc`, `display_toc`, ...).
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl PageRecord {
    pub fn new(current_page_name: impl Into<String>) -> Self {
        Self {
            current_page_name: current_page_name.into(),
            ..Default::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Outcome of replacing a release's documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub sync_id: Uuid,
    pub created: usize,
    pub skipped_empty: usize,
    pub skipped_excluded: usize,
}

/// Build the documents a sync will store, in input order.
///
/// Pages are dropped when they are not documents (see
/// [`validate_page_fields`]) or when their path is excluded. A later page
/// with the same normalized path replaces an earlier one.
pub fn prepare_documents(
    release: &DocumentRelease,
    records: &[PageRecord],
    exclusions: &Exclusions,
    site: &SiteConfig,
) -> (Vec<NewDocument>, SyncReport) {
    let mut report = SyncReport {
        sync_id: Uuid::new_v4(),
        created: 0,
        skipped_empty: 0,
        skipped_excluded: 0,
    };
    let config = site.search_config_for(&release.lang);
    let mut documents: Vec<NewDocument> = Vec::new();
    let mut by_path: HashMap<String, usize> = HashMap::new();

    for record in records {
        let path = DocumentPath::parse(&record.current_page_name);

        if exclusions.is_excluded(&release.lang, release.version(), path.as_str()) {
            tracing::debug!(path = %path.as_str(), reason = %SkipReason::Excluded, "skipping page");
            report.skipped_excluded += 1;
            continue;
        }

        let title = record.title.as_deref().map(|t| html::to_text(t).trim().to_string());
        let body_text = record.body.as_deref().map(html::to_text);
        if let Err(reason) = validate_page_fields(title.as_deref(), body_text.as_deref()) {
            tracing::debug!(path = %path.as_str(), %reason, "skipping page");
            report.skipped_empty += 1;
            continue;
        }

        let mut extra = record.metadata.clone();
        let toc = extra
            .get("toc")
            .and_then(Value::as_str)
            .map(str::to_string);
        for key in DERIVED_KEYS {
            extra.remove(key);
        }

        let metadata = DocumentMetadata {
            body: record.body.clone(),
            title: record.title.clone(),
            toc,
            breadcrumbs: Vec::new(),
            slug: path.slug().to_string(),
            parents: path.parents(),
            extra,
        };
        let document = NewDocument {
            path: path.into_inner(),
            title: title.unwrap_or_default(),
            metadata,
            config,
        };

        match by_path.get(&document.path) {
            Some(&index) => documents[index] = document,
            None => {
                by_path.insert(document.path.clone(), documents.len());
                documents.push(document);
            }
        }
    }

    attach_breadcrumbs(&mut documents);
    report.created = documents.len();
    (documents, report)
}

/// Fill each document's breadcrumbs from its ancestors present in the set.
fn attach_breadcrumbs(documents: &mut [NewDocument]) {
    let titles: HashMap<String, String> = documents
        .iter()
        .map(|d| (d.path.clone(), d.title.clone()))
        .collect();

    for document in documents.iter_mut() {
        let mut trail: Vec<Breadcrumb> = DocumentPath::parse(&document.path)
            .ancestors()
            .into_iter()
            .filter_map(|path| {
                titles.get(&path).map(|title| Breadcrumb {
                    path,
                    title: title.clone(),
                })
            })
            .collect();
        trail.sort_by(|a, b| a.path.cmp(&b.path));
        document.metadata.breadcrumbs = trail;
    }
}
