use sqlx::{Sqlite, SqlitePool, Transaction};

use super::model::{Document, DocumentRow, NewDocument, SearchText};
use super::search::DocumentSearch;
use super::sync::{prepare_documents, PageRecord, SyncReport};
use crate::config::{SearchConfig, SiteConfig};
use crate::doc_release::DocumentRelease;
use crate::error::{CoreError, Result};
use crate::exclusions::Exclusions;

const DOCUMENT_COLUMNS: &str = "id, release_id, path, title, metadata, config";

/// Repository for the `documents` table and its search vectors.
#[derive(Clone)]
pub struct DocumentStore {
    pool: SqlitePool,
    site: SiteConfig,
}

impl DocumentStore {
    pub fn new(pool: SqlitePool, site: SiteConfig) -> Self {
        Self { pool, site }
    }

    /// Insert one document into `release` and index it.
    #[tracing::instrument(skip(self, document), fields(path = %document.path))]
    pub async fn insert(&self, release_id: i64, document: &NewDocument) -> Result<Document> {
        let mut tx = self.pool.begin().await?;
        let id = insert_document(&mut tx, release_id, document).await?;
        tx.commit().await?;
        self.get(id).await
    }

    pub async fn get(&self, id: i64) -> Result<Document> {
        let row: Option<DocumentRow> =
            sqlx::query_as(&format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(|row| row.into_document(&self.site))
            .ok_or_else(|| CoreError::NotFound(format!("document {id}")))
    }

    /// The document at `path` in a release.
    #[tracing::instrument(skip(self, release), fields(release_id = release.id))]
    pub async fn get_by_path(&self, release: &DocumentRelease, path: &str) -> Result<Document> {
        let row: Option<DocumentRow> = sqlx::query_as(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE release_id = ?1 AND path = ?2"
        ))
        .bind(release.id)
        .bind(path)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|row| row.into_document(&self.site)).ok_or_else(|| {
            CoreError::NotFound(format!("{}{path}", release.absolute_url()))
        })
    }

    /// All documents of a release, by path.
    pub async fn documents(&self, release: &DocumentRelease) -> Result<Vec<Document>> {
        let rows: Vec<DocumentRow> = sqlx::query_as(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE release_id = ?1 ORDER BY path"
        ))
        .bind(release.id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|row| row.into_document(&self.site)).collect())
    }

    /// Replace the documents of `release` with the given built pages.
    ///
    /// Runs as one transaction: the old set is deleted and the new one
    /// inserted and indexed, or nothing changes. The delete takes SQLite's
    /// write lock first, so concurrent syncs of the same release run one
    /// after the other and the last one wins.
    #[tracing::instrument(skip_all, fields(lang = %release.lang, version = %release.version(), pages = records.len()))]
    pub async fn sync_to_db(
        &self,
        release: &DocumentRelease,
        records: &[PageRecord],
        exclusions: &Exclusions,
    ) -> Result<SyncReport> {
        let (documents, report) = prepare_documents(release, records, exclusions, &self.site);

        let mut tx = self.pool.begin().await?;
        let removed = sqlx::query("DELETE FROM documents WHERE release_id = ?1")
            .bind(release.id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        for document in &documents {
            insert_document(&mut tx, release.id, document).await?;
        }
        tx.commit().await?;

        tracing::info!(
            sync_id = %report.sync_id,
            removed,
            created = report.created,
            skipped_empty = report.skipped_empty,
            skipped_excluded = report.skipped_excluded,
            "synced documents"
        );
        Ok(report)
    }

    /// Start a search within `release`. Nothing runs until it is fetched.
    pub fn search<'a>(&'a self, query: &str, release: &DocumentRelease) -> DocumentSearch<'a> {
        DocumentSearch::new(&self.pool, &self.site, query, release)
    }

    /// Rebuild the search vector of every document. Returns the number of
    /// documents indexed.
    ///
    /// A stored configuration the site does not know is indexed with the
    /// site default.
    #[tracing::instrument(skip(self))]
    pub async fn search_update(&self) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        clear_search_vectors(&mut tx).await?;
        let rows: Vec<DocumentRow> =
            sqlx::query_as(&format!("SELECT {DOCUMENT_COLUMNS} FROM documents ORDER BY id"))
                .fetch_all(&mut *tx)
                .await?;
        let count = rows.len() as u64;
        for row in rows {
            let document = row.into_document(&self.site);
            let text = SearchText::new(&document.title, &document.metadata);
            index_document(&mut tx, document.id, document.config, &text).await?;
        }
        tx.commit().await?;

        tracing::info!(count, "rebuilt search vectors");
        Ok(count)
    }

    /// Drop the search vector of every document. Returns the number of
    /// documents affected.
    #[tracing::instrument(skip(self))]
    pub async fn search_reset(&self) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents")
            .fetch_one(&mut *tx)
            .await?;
        clear_search_vectors(&mut tx).await?;
        tx.commit().await?;

        tracing::info!(count, "cleared search vectors");
        Ok(count as u64)
    }

    /// Number of documents with a search vector.
    pub async fn count_indexed(&self) -> Result<u64> {
        let mut total = 0;
        for config in SearchConfig::ALL {
            let count: i64 = sqlx::query_scalar(&format!(
                "SELECT COUNT(*) FROM {table} JOIN documents d ON d.id = {table}.rowid",
                table = config.table()
            ))
            .fetch_one(&self.pool)
            .await?;
            total += count as u64;
        }
        Ok(total)
    }
}

async fn insert_document(
    tx: &mut Transaction<'_, Sqlite>,
    release_id: i64,
    document: &NewDocument,
) -> Result<i64> {
    let id = sqlx::query(
        r#"
        INSERT INTO documents (release_id, path, title, metadata, config)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(release_id)
    .bind(&document.path)
    .bind(&document.title)
    .bind(sqlx::types::Json(&document.metadata))
    .bind(document.config.as_str())
    .execute(&mut **tx)
    .await?
    .last_insert_rowid();

    let text = SearchText::new(&document.title, &document.metadata);
    index_document(tx, id, document.config, &text).await?;
    Ok(id)
}

async fn index_document(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    config: SearchConfig,
    text: &SearchText,
) -> Result<()> {
    sqlx::query(&format!(
        "INSERT INTO {}(rowid, title, slug, toc, body, parents) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        config.table()
    ))
    .bind(id)
    .bind(&text.title)
    .bind(&text.slug)
    .bind(&text.toc)
    .bind(&text.body)
    .bind(&text.parents)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn clear_search_vectors(tx: &mut Transaction<'_, Sqlite>) -> Result<()> {
    for config in SearchConfig::ALL {
        sqlx::query(&format!("DELETE FROM {}", config.table()))
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}
