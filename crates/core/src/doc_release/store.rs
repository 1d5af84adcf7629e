use sqlx::SqlitePool;

use super::model::{DocumentRelease, DocumentReleaseRow, DEV_VERSION};
use crate::error::{CoreError, Result};

/// Document release joined with its release and with the newest final
/// micro release of the same series (or the release itself when the series
/// has no final release yet).
const SELECT_DOCUMENT_RELEASE: &str = r#"
    SELECT dr.id, dr.lang, dr.is_default,
           r.id AS r_id, r.version AS r_version, r.major AS r_major, r.minor AS r_minor,
           r.micro AS r_micro, r.status AS r_status, r.iteration AS r_iteration,
           r.is_lts AS r_is_lts, r.date AS r_date, r.eol_date AS r_eol_date,
           latest.eol_date AS series_eol_date
    FROM document_releases dr
    LEFT JOIN releases r ON r.id = dr.release_id
    LEFT JOIN releases latest ON latest.id = COALESCE(
        (SELECT l.id FROM releases l
         WHERE l.major = r.major AND l.minor = r.minor AND l.status = 'final'
         ORDER BY l.micro DESC, l.id DESC LIMIT 1),
        r.id)
"#;

/// Repository for the `document_releases` table.
#[derive(Clone)]
pub struct DocumentReleaseStore {
    pool: SqlitePool,
}

impl DocumentReleaseStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the document scope for `lang` and a release, or for the
    /// development version when `release_id` is `None`.
    ///
    /// # Errors
    /// `CoreError::Conflict` when the scope already exists.
    #[tracing::instrument(skip(self))]
    pub async fn create(
        &self,
        lang: &str,
        release_id: Option<i64>,
        is_default: bool,
    ) -> Result<DocumentRelease> {
        let id = sqlx::query(
            "INSERT INTO document_releases (lang, release_id, is_default) VALUES (?1, ?2, ?3)",
        )
        .bind(lang)
        .bind(release_id)
        .bind(is_default)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                let scope = match release_id {
                    Some(id) => format!("{lang} docs for release {id}"),
                    None => format!("{lang} docs for {DEV_VERSION}"),
                };
                CoreError::Conflict(scope)
            }
            other => other.into(),
        })?
        .last_insert_rowid();
        self.get(id).await
    }

    pub async fn get(&self, id: i64) -> Result<DocumentRelease> {
        let row: Option<DocumentReleaseRow> =
            sqlx::query_as(&format!("{SELECT_DOCUMENT_RELEASE} WHERE dr.id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(DocumentRelease::from)
            .ok_or_else(|| CoreError::NotFound(format!("document release {id}")))
    }

    /// Every language's docs for `version`; `"dev"` selects the development docs.
    #[tracing::instrument(skip(self))]
    pub async fn by_version(&self, version: &str) -> Result<Vec<DocumentRelease>> {
        let rows: Vec<DocumentReleaseRow> = if version == DEV_VERSION {
            sqlx::query_as(&format!(
                "{SELECT_DOCUMENT_RELEASE} WHERE dr.release_id IS NULL ORDER BY dr.lang"
            ))
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as(&format!(
                "{SELECT_DOCUMENT_RELEASE} WHERE r.version = ?1 ORDER BY dr.lang"
            ))
            .bind(version)
            .fetch_all(&self.pool)
            .await?
        };
        Ok(rows.into_iter().map(DocumentRelease::from).collect())
    }

    /// The docs for one version in one language.
    ///
    /// # Errors
    /// `CoreError::NotFound` when that translation does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_version_and_lang(&self, version: &str, lang: &str) -> Result<DocumentRelease> {
        self.by_version(version)
            .await?
            .into_iter()
            .find(|dr| dr.lang == lang)
            .ok_or_else(|| CoreError::NotFound(format!("documentation {lang}/{version}")))
    }

    /// Distinct language codes available for `version`, sorted.
    #[tracing::instrument(skip(self))]
    pub async fn get_available_languages_by_version(&self, version: &str) -> Result<Vec<String>> {
        let mut langs: Vec<String> = self
            .by_version(version)
            .await?
            .into_iter()
            .map(|dr| dr.lang)
            .collect();
        langs.sort();
        langs.dedup();
        Ok(langs)
    }

    /// The default ("current") docs for a language.
    #[tracing::instrument(skip(self))]
    pub async fn current(&self, lang: &str) -> Result<DocumentRelease> {
        let row: Option<DocumentReleaseRow> = sqlx::query_as(&format!(
            "{SELECT_DOCUMENT_RELEASE} WHERE dr.lang = ?1 AND dr.is_default = 1 ORDER BY dr.id DESC LIMIT 1"
        ))
        .bind(lang)
        .fetch_optional(&self.pool)
        .await?;
        row.map(DocumentRelease::from)
            .ok_or_else(|| CoreError::NotFound(format!("current documentation for {lang}")))
    }
}
