//! Release version parsing.
//!
//! Versions follow the `MAJOR.MINOR[.MICRO][(a|b|rc)N]` convention:
//! - Final: `1.8`, `1.8.1`
//! - Pre-release: `3.0a1`, `3.0b2`, `4.2rc1`

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\.(\d+)(?:\.(\d+))?(?:(a|b|rc)(\d+))?$").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionStatus {
    Alpha,
    Beta,
    Rc,
    Final,
}

impl VersionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionStatus::Alpha => "alpha",
            VersionStatus::Beta => "beta",
            VersionStatus::Rc => "rc",
            VersionStatus::Final => "final",
        }
    }
}

impl FromStr for VersionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alpha" => Ok(VersionStatus::Alpha),
            "beta" => Ok(VersionStatus::Beta),
            "rc" => Ok(VersionStatus::Rc),
            "final" => Ok(VersionStatus::Final),
            other => Err(format!("unknown release status: {other}")),
        }
    }
}

/// A parsed release version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub micro: u32,
    pub status: VersionStatus,
    pub iteration: u32,
}

impl Version {
    /// Parse a version string, `None` if it does not follow the convention.
    pub fn parse(input: &str) -> Option<Self> {
        let caps = VERSION.captures(input.trim())?;
        let number = |i: usize| -> Option<u32> {
            match caps.get(i) {
                Some(m) => m.as_str().parse().ok(),
                None => Some(0),
            }
        };
        let status = match caps.get(4).map(|m| m.as_str()) {
            Some("a") => VersionStatus::Alpha,
            Some("b") => VersionStatus::Beta,
            Some("rc") => VersionStatus::Rc,
            _ => VersionStatus::Final,
        };
        Some(Self {
            major: number(1)?,
            minor: number(2)?,
            micro: number(3)?,
            status,
            iteration: number(5)?,
        })
    }

    /// The `MAJOR.MINOR` series this version belongs to.
    pub fn series(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }

    pub fn is_final(&self) -> bool {
        self.status == VersionStatus::Final
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.micro, self.status, self.iteration).cmp(&(
            other.major,
            other.minor,
            other.micro,
            other.status,
            other.iteration,
        ))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if self.micro > 0 {
            write!(f, ".{}", self.micro)?;
        }
        match self.status {
            VersionStatus::Alpha => write!(f, "a{}", self.iteration),
            VersionStatus::Beta => write!(f, "b{}", self.iteration),
            VersionStatus::Rc => write!(f, "rc{}", self.iteration),
            VersionStatus::Final => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_feature_release() {
        let v = Version::parse("1.8").unwrap();
        assert_eq!((v.major, v.minor, v.micro), (1, 8, 0));
        assert!(v.is_final());
        assert_eq!(v.series(), "1.8");
    }

    #[test]
    fn parse_micro_release() {
        let v = Version::parse("1.8.1").unwrap();
        assert_eq!(v.micro, 1);
        assert_eq!(v.series(), "1.8");
        assert_eq!(v.to_string(), "1.8.1");
    }

    #[test]
    fn parse_pre_releases() {
        let a = Version::parse("3.0a1").unwrap();
        assert_eq!(a.status, VersionStatus::Alpha);
        assert_eq!(a.iteration, 1);
        let rc = Version::parse("4.2rc2").unwrap();
        assert_eq!(rc.status, VersionStatus::Rc);
        assert_eq!(rc.to_string(), "4.2rc2");
    }

    #[test]
    fn reject_malformed() {
        assert!(Version::parse("dev").is_none());
        assert!(Version::parse("1").is_none());
        assert!(Version::parse("1.8.x").is_none());
    }

    #[test]
    fn numeric_ordering() {
        let mut versions: Vec<Version> = ["1.11", "1.8", "2.0", "2.0rc1", "1.8.1"]
            .iter()
            .filter_map(|v| Version::parse(v))
            .collect();
        versions.sort();
        let sorted: Vec<String> = versions.iter().map(Version::to_string).collect();
        assert_eq!(sorted, vec!["1.8", "1.8.1", "1.11", "2.0rc1", "2.0"]);
    }
}
