//! Ranked, highlighted full-text search over one release's documents.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::model::{Breadcrumb, Document, DocumentRow};
use crate::config::{SearchConfig, SiteConfig};
use crate::doc_release::DocumentRelease;
use crate::error::{CoreError, Result};

/// Highlight markers wrapped around matched terms.
pub const START_SEL: &str = "<mark>";
pub const STOP_SEL: &str = "</mark>";

/// Tokens in a body highlight fragment.
const HIGHLIGHT_TOKENS: u32 = 35;

/// `bm25` weights for the title, slug, toc, body and parents columns.
const COLUMN_WEIGHTS: &str = "10.0, 10.0, 4.0, 2.0, 1.0";

/// A matching document with its relevance and highlighted snippets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub document: Document,
    /// Higher is more relevant.
    pub rank: f64,
    /// The title with matches marked.
    pub headline: String,
    /// A body fragment with matches marked.
    pub highlight: String,
}

impl SearchHit {
    pub fn path(&self) -> &str {
        &self.document.path
    }

    pub fn title(&self) -> &str {
        &self.document.title
    }

    pub fn breadcrumbs(&self) -> &[Breadcrumb] {
        self.document.breadcrumbs()
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SearchRow {
    #[sqlx(flatten)]
    document: DocumentRow,
    search_rank: f64,
    headline: String,
    highlight: String,
}

/// A search over one release, run only when fetched.
///
/// Results are ordered by rank, best first, then by document id so equal
/// ranks come back in a stable order.
#[derive(Debug, Clone)]
pub struct DocumentSearch<'a> {
    pool: &'a SqlitePool,
    site: &'a SiteConfig,
    query: String,
    release_id: i64,
    title: Option<String>,
    limit: Option<u32>,
    offset: u32,
}

impl<'a> DocumentSearch<'a> {
    pub(crate) fn new(
        pool: &'a SqlitePool,
        site: &'a SiteConfig,
        query: &str,
        release: &DocumentRelease,
    ) -> Self {
        Self {
            pool,
            site,
            query: query.to_string(),
            release_id: release.id,
            title: None,
            limit: None,
            offset: 0,
        }
    }

    /// Keep only documents with exactly this title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// The FTS5 expression the query compiles to; `None` matches nothing.
    pub fn match_expr(&self) -> Option<String> {
        docsite_websearch::compile(&self.query)
    }

    fn filters(&self) -> String {
        let mut filters = String::from("d.release_id = ?2");
        if self.title.is_some() {
            filters.push_str(" AND d.title = ?3");
        }
        filters
    }

    fn branch(&self, config: SearchConfig) -> String {
        let table = config.table();
        format!(
            r#"
            SELECT d.id, d.release_id, d.path, d.title, d.metadata, d.config,
                   s.search_rank, s.headline, s.highlight
            FROM (
                SELECT rowid AS doc_id,
                       -bm25({table}, {COLUMN_WEIGHTS}) AS search_rank,
                       highlight({table}, 0, '{START_SEL}', '{STOP_SEL}') AS headline,
                       snippet({table}, 3, '{START_SEL}', '{STOP_SEL}', '…', {HIGHLIGHT_TOKENS}) AS highlight
                FROM {table}
                WHERE {table} MATCH ?1
            ) s
            JOIN documents d ON d.id = s.doc_id
            WHERE {filters}
            "#,
            filters = self.filters(),
        )
    }

    fn sql(&self) -> String {
        let branches: Vec<String> = SearchConfig::ALL.iter().map(|c| self.branch(*c)).collect();
        let limit = self.limit.map(i64::from).unwrap_or(-1);
        format!(
            "{} ORDER BY search_rank DESC, id ASC LIMIT {limit} OFFSET {}",
            branches.join(" UNION ALL "),
            self.offset
        )
    }

    /// Run the search. An empty or exclusion-only query returns no hits.
    #[tracing::instrument(skip(self), fields(query = %self.query, release_id = self.release_id))]
    pub async fn fetch_all(self) -> Result<Vec<SearchHit>> {
        let Some(expr) = self.match_expr() else {
            return Ok(Vec::new());
        };
        let sql = self.sql();
        let mut query = sqlx::query_as::<_, SearchRow>(&sql)
            .bind(expr)
            .bind(self.release_id);
        if let Some(title) = &self.title {
            query = query.bind(title);
        }
        let rows = query.fetch_all(self.pool).await?;

        let hits: Vec<SearchHit> = rows
            .into_iter()
            .map(|row| SearchHit {
                document: row.document.into_document(self.site),
                rank: row.search_rank,
                headline: row.headline,
                highlight: row.highlight,
            })
            .collect();
        tracing::debug!(count = hits.len(), "document search completed");
        Ok(hits)
    }

    /// The best hit.
    ///
    /// # Errors
    /// `CoreError::NotFound` when nothing matches.
    pub async fn fetch_one(self) -> Result<SearchHit> {
        let query = self.query.clone();
        self.limit(1)
            .fetch_all()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::NotFound(format!("no document matches {query:?}")))
    }

    /// Number of matching documents, ignoring limit and offset.
    pub async fn count(self) -> Result<usize> {
        let search = Self {
            limit: None,
            offset: 0,
            ..self
        };
        Ok(search.fetch_all().await?.len())
    }
}
