use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::builds;
use crate::config::{SearchConfig, SiteConfig};
use crate::doc_release::DocumentRelease;
use crate::error::Result;
use crate::html;

/// One entry of a document's breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub path: String,
    pub title: String,
}

/// Rendering data kept alongside a document, stored as JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Rendered HTML body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Title as built, markup included.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Table of contents HTML fragment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toc: Option<String>,
    #[serde(default)]
    pub breadcrumbs: Vec<Breadcrumb>,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub parents: String,
    /// Anything else the build produced for the page.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A rendered documentation page. Maps to the `documents` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub release_id: i64,
    pub path: String,
    /// Plain-text title.
    pub title: String,
    pub metadata: DocumentMetadata,
    pub config: SearchConfig,
}

impl Document {
    pub fn body(&self) -> &str {
        self.metadata.body.as_deref().unwrap_or("")
    }

    pub fn breadcrumbs(&self) -> &[Breadcrumb] {
        &self.metadata.breadcrumbs
    }

    pub fn absolute_url(&self, release: &DocumentRelease) -> String {
        if self.path.is_empty() {
            release.absolute_url()
        } else {
            format!("{}{}/", release.absolute_url(), self.path)
        }
    }

    /// The body, read from the built page file when it was not stored.
    pub async fn load_body(&self, build_root: &Path, release: &DocumentRelease) -> Result<Option<String>> {
        if let Some(body) = &self.metadata.body {
            return Ok(Some(body.clone()));
        }
        let docroot = builds::doc_root(build_root, &release.lang, release.version());
        let Some(file) = builds::doc_path(&docroot, &self.path).await else {
            return Ok(None);
        };
        let content = tokio::fs::read_to_string(&file).await?;
        let page: Map<String, Value> = serde_json::from_str(&content)?;
        Ok(page.get("body").and_then(Value::as_str).map(str::to_string))
    }
}

/// A document ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    pub path: String,
    pub title: String,
    pub metadata: DocumentMetadata,
    pub config: SearchConfig,
}

/// Text of a document as fed to the full-text index, one field per
/// weighted column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchText {
    pub title: String,
    pub slug: String,
    pub toc: String,
    pub body: String,
    pub parents: String,
}

impl SearchText {
    pub fn new(title: &str, metadata: &DocumentMetadata) -> Self {
        Self {
            title: title.to_string(),
            slug: metadata.slug.clone(),
            toc: metadata.toc.as_deref().map(html::to_text).unwrap_or_default(),
            body: metadata.body.as_deref().map(html::to_text).unwrap_or_default(),
            parents: metadata.parents.clone(),
        }
    }
}

/// Database row representation of a document.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct DocumentRow {
    pub id: i64,
    pub release_id: i64,
    pub path: String,
    pub title: String,
    pub metadata: sqlx::types::Json<DocumentMetadata>,
    pub config: String,
}

impl DocumentRow {
    /// Unknown configuration names resolve to the site default.
    pub(crate) fn into_document(self, site: &SiteConfig) -> Document {
        Document {
            id: self.id,
            release_id: self.release_id,
            config: site.resolve_search_config(&self.config),
            path: self.path,
            title: self.title,
            metadata: self.metadata.0,
        }
    }
}
