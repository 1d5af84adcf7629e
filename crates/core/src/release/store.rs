use sqlx::SqlitePool;

use super::model::{NewRelease, Release, ReleaseRow};
use super::version::{Version, VersionStatus};
use crate::error::{CoreError, Result};

const RELEASE_COLUMNS: &str =
    "id, version, major, minor, micro, status, iteration, is_lts, date, eol_date";

/// Repository for the `releases` table.
#[derive(Clone)]
pub struct ReleaseStore {
    pool: SqlitePool,
}

impl ReleaseStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a release.
    ///
    /// A dated final micro release (`1.8.1`) closes the support window of the
    /// earlier releases of its series that are still open: their EOL date
    /// becomes this release's date.
    #[tracing::instrument(skip(self, new), fields(version = %new.version))]
    pub async fn create(&self, new: &NewRelease) -> Result<Release> {
        let version = Version::parse(&new.version)
            .ok_or_else(|| CoreError::Validation(format!("malformed version: {}", new.version)))?;

        let mut tx = self.pool.begin().await?;

        let id = sqlx::query(
            r#"
            INSERT INTO releases (version, major, minor, micro, status, iteration, is_lts, date, eol_date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&new.version)
        .bind(version.major as i64)
        .bind(version.minor as i64)
        .bind(version.micro as i64)
        .bind(version.status.as_str())
        .bind(version.iteration as i64)
        .bind(new.is_lts)
        .bind(new.date)
        .bind(new.eol_date)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        if let Some(date) = new.date.filter(|_| version.is_final() && version.micro > 0) {
            let closed = sqlx::query(
                r#"
                UPDATE releases SET eol_date = ?1
                WHERE major = ?2 AND minor = ?3 AND status = ?4
                  AND micro < ?5 AND eol_date IS NULL AND id != ?6
                "#,
            )
            .bind(date)
            .bind(version.major as i64)
            .bind(version.minor as i64)
            .bind(VersionStatus::Final.as_str())
            .bind(version.micro as i64)
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
            if closed > 0 {
                tracing::info!(series = %version.series(), %date, closed, "closed support window of previous micro releases");
            }
        }

        tx.commit().await?;

        Ok(Release {
            id,
            version: new.version.clone(),
            parsed: Some(version),
            is_lts: new.is_lts,
            date: new.date,
            eol_date: new.eol_date,
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_by_version(&self, version: &str) -> Result<Release> {
        let row: Option<ReleaseRow> =
            sqlx::query_as(&format!("SELECT {RELEASE_COLUMNS} FROM releases WHERE version = ?1"))
                .bind(version)
                .fetch_optional(&self.pool)
                .await?;
        row.map(Release::from)
            .ok_or_else(|| CoreError::NotFound(format!("release {version}")))
    }

    /// All releases, oldest version first.
    pub async fn list(&self) -> Result<Vec<Release>> {
        let rows: Vec<ReleaseRow> =
            sqlx::query_as(&format!("SELECT {RELEASE_COLUMNS} FROM releases"))
                .fetch_all(&self.pool)
                .await?;
        let mut releases: Vec<Release> = rows.into_iter().map(Release::from).collect();
        releases.sort_by(|a, b| a.parsed.cmp(&b.parsed).then_with(|| a.id.cmp(&b.id)));
        Ok(releases)
    }
}
