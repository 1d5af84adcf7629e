use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::version::{Version, VersionStatus};

/// A published (or upcoming) release of the documented product.
/// Maps to the `releases` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub id: i64,
    pub version: String,
    #[serde(skip)]
    pub parsed: Option<Version>,
    pub is_lts: bool,
    /// Release date; `None` for alphas, betas and release candidates in progress.
    pub date: Option<NaiveDate>,
    /// End of extended support; `None` while the release is maintained.
    pub eol_date: Option<NaiveDate>,
}

impl Release {
    /// The `MAJOR.MINOR` series, or the raw version when it cannot be parsed.
    pub fn series(&self) -> String {
        self.parsed
            .map(|v| v.series())
            .unwrap_or_else(|| self.version.clone())
    }
}

/// Input for creating a release.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewRelease {
    pub version: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub eol_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_lts: bool,
}

impl NewRelease {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Default::default()
        }
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn eol_date(mut self, eol_date: NaiveDate) -> Self {
        self.eol_date = Some(eol_date);
        self
    }

    pub fn lts(mut self) -> Self {
        self.is_lts = true;
        self
    }
}

/// Database row representation of a release.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct ReleaseRow {
    pub id: i64,
    pub version: String,
    pub major: i64,
    pub minor: i64,
    pub micro: i64,
    pub status: String,
    pub iteration: i64,
    pub is_lts: bool,
    pub date: Option<NaiveDate>,
    pub eol_date: Option<NaiveDate>,
}

impl From<ReleaseRow> for Release {
    fn from(row: ReleaseRow) -> Self {
        let parsed = row.status.parse::<VersionStatus>().ok().map(|status| Version {
            major: row.major as u32,
            minor: row.minor as u32,
            micro: row.micro as u32,
            status,
            iteration: row.iteration as u32,
        });
        Release {
            id: row.id,
            version: row.version,
            parsed,
            is_lts: row.is_lts,
            date: row.date,
            eol_date: row.eol_date,
        }
    }
}
