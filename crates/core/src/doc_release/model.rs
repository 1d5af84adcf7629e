use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::release::{Release, Version, VersionStatus};

/// Version label used for documents that track the development branch.
pub const DEV_VERSION: &str = "dev";

/// Where a documentation release stands in its support cycle.
///
/// Derived from stored dates, never stored itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseStatus {
    /// Docs for the development branch.
    Dev,
    /// An alpha, beta or release candidate without a release date yet.
    Preview,
    /// Released and still maintained.
    Supported,
    /// Past its end of life.
    Unsupported,
}

impl ReleaseStatus {
    pub fn is_supported(&self) -> bool {
        !matches!(self, ReleaseStatus::Unsupported)
    }
}

/// Snapshot of a `document_releases` row: the (language, release) scope a
/// set of documents belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRelease {
    pub id: i64,
    pub lang: String,
    /// Whether these are the docs served when no version is requested.
    pub is_default: bool,
    /// `None` for the development version.
    pub release: Option<Release>,
    /// EOL date of the newest final micro release in the release's series.
    /// Support is decided on this date rather than on the release's own.
    pub series_eol_date: Option<NaiveDate>,
}

impl DocumentRelease {
    /// The release version, or `"dev"`.
    pub fn version(&self) -> &str {
        self.release
            .as_ref()
            .map(|r| r.version.as_str())
            .unwrap_or(DEV_VERSION)
    }

    pub fn status_on(&self, today: NaiveDate) -> ReleaseStatus {
        let Some(release) = &self.release else {
            return ReleaseStatus::Dev;
        };
        if release.date.is_none() {
            return ReleaseStatus::Preview;
        }
        match self.series_eol_date {
            Some(eol) if eol <= today => ReleaseStatus::Unsupported,
            _ => ReleaseStatus::Supported,
        }
    }

    pub fn status(&self) -> ReleaseStatus {
        self.status_on(Local::now().date_naive())
    }

    pub fn is_dev(&self) -> bool {
        self.release.is_none()
    }

    pub fn is_preview(&self) -> bool {
        self.release.as_ref().is_some_and(|r| r.date.is_none())
    }

    pub fn is_supported_on(&self, today: NaiveDate) -> bool {
        self.status_on(today).is_supported()
    }

    pub fn is_supported(&self) -> bool {
        self.status().is_supported()
    }

    /// Source repository reference the docs are built from.
    pub fn scm_url(&self, base: &str) -> String {
        match &self.release {
            Some(release) => format!("{base}@stable/{}.x", release.series()),
            None => format!("{base}@main"),
        }
    }

    pub fn absolute_url(&self) -> String {
        format!("/{}/{}/", self.lang, self.version())
    }
}

/// Database row of a document release joined with its release.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct DocumentReleaseRow {
    pub id: i64,
    pub lang: String,
    pub is_default: bool,
    pub r_id: Option<i64>,
    pub r_version: Option<String>,
    pub r_major: Option<i64>,
    pub r_minor: Option<i64>,
    pub r_micro: Option<i64>,
    pub r_status: Option<String>,
    pub r_iteration: Option<i64>,
    pub r_is_lts: Option<bool>,
    pub r_date: Option<NaiveDate>,
    pub r_eol_date: Option<NaiveDate>,
    pub series_eol_date: Option<NaiveDate>,
}

impl From<DocumentReleaseRow> for DocumentRelease {
    fn from(row: DocumentReleaseRow) -> Self {
        let release = match (row.r_id, row.r_version) {
            (Some(id), Some(version)) => {
                let parsed = row
                    .r_status
                    .as_deref()
                    .and_then(|s| s.parse::<VersionStatus>().ok())
                    .map(|status| Version {
                        major: row.r_major.unwrap_or_default() as u32,
                        minor: row.r_minor.unwrap_or_default() as u32,
                        micro: row.r_micro.unwrap_or_default() as u32,
                        status,
                        iteration: row.r_iteration.unwrap_or_default() as u32,
                    });
                Some(Release {
                    id,
                    version,
                    parsed,
                    is_lts: row.r_is_lts.unwrap_or_default(),
                    date: row.r_date,
                    eol_date: row.r_eol_date,
                })
            }
            _ => None,
        };
        DocumentRelease {
            id: row.id,
            lang: row.lang,
            is_default: row.is_default,
            release,
            series_eol_date: row.series_eol_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn doc_release(release: Option<Release>, series_eol_date: Option<NaiveDate>) -> DocumentRelease {
        DocumentRelease {
            id: 1,
            lang: "en".into(),
            is_default: false,
            release,
            series_eol_date,
        }
    }

    fn release(version: &str, date: Option<NaiveDate>, eol_date: Option<NaiveDate>) -> Release {
        Release {
            id: 1,
            version: version.into(),
            parsed: Version::parse(version),
            is_lts: false,
            date,
            eol_date,
        }
    }

    #[test]
    fn exactly_one_status_holds() {
        let t = today();
        let cases = [
            (doc_release(None, None), ReleaseStatus::Dev),
            (doc_release(Some(release("3.0", None, None)), None), ReleaseStatus::Preview),
            (
                doc_release(Some(release("1.8", Some(t - Days::new(5)), None)), None),
                ReleaseStatus::Supported,
            ),
            (
                doc_release(
                    Some(release("1.8", Some(t - Days::new(15)), Some(t - Days::new(5)))),
                    Some(t - Days::new(5)),
                ),
                ReleaseStatus::Unsupported,
            ),
        ];
        for (dr, expected) in cases {
            assert_eq!(dr.status_on(t), expected);
            assert_eq!(dr.is_dev(), expected == ReleaseStatus::Dev);
            assert_eq!(dr.is_preview(), expected == ReleaseStatus::Preview);
            assert_eq!(dr.is_supported_on(t), expected != ReleaseStatus::Unsupported);
        }
    }

    #[test]
    fn eol_today_is_unsupported() {
        let t = today();
        let dr = doc_release(Some(release("1.8", Some(t - Days::new(30)), Some(t))), Some(t));
        assert_eq!(dr.status_on(t), ReleaseStatus::Unsupported);
        assert_eq!(dr.status_on(t - Days::new(1)), ReleaseStatus::Supported);
    }

    #[test]
    fn scm_url_points_at_stable_branch() {
        let dr = doc_release(Some(release("4.1", None, None)), None);
        assert_eq!(
            dr.scm_url("https://github.com/django/django.git"),
            "https://github.com/django/django.git@stable/4.1.x"
        );
        let micro = doc_release(Some(release("4.1.3", None, None)), None);
        assert_eq!(micro.scm_url("repo"), "repo@stable/4.1.x");
        assert_eq!(doc_release(None, None).scm_url("repo"), "repo@main");
    }

    #[test]
    fn urls_and_version_labels() {
        let dev = doc_release(None, None);
        assert_eq!(dev.version(), "dev");
        assert_eq!(dev.absolute_url(), "/en/dev/");
        let stable = doc_release(Some(release("5.0", None, None)), None);
        assert_eq!(stable.absolute_url(), "/en/5.0/");
    }
}
