//! Paths kept out of the index, read from a robots-style resource.
//!
//! Each `Disallow: /{lang}/{version}/{prefix}` line excludes documents of that
//! language and version whose path starts with `prefix`. `*` matches any
//! language or version. Partially translated sections are listed this way.
//!
//! Prefixes match whole path segments, unlike a crawler reading the same
//! file: `Disallow: /el/1.8/ref` keeps `reference/models` indexed, while a
//! robots string prefix would drop it.

use std::path::Path;

/// One `Disallow` rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionRule {
    pub lang: String,
    pub version: String,
    pub prefix: Vec<String>,
}

impl ExclusionRule {
    /// Parse a `Disallow:` line; other lines and rules without a path prefix
    /// yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let value = line.trim().strip_prefix("Disallow:")?.trim();
        let mut segments = value.split('/').filter(|s| !s.is_empty());
        let lang = segments.next()?.to_string();
        let version = segments.next()?.to_string();
        let prefix: Vec<String> = segments.map(str::to_string).collect();
        if prefix.is_empty() {
            return None;
        }
        Some(Self {
            lang,
            version,
            prefix,
        })
    }

    fn applies_to(&self, lang: &str, version: &str) -> bool {
        (self.lang == "*" || self.lang == lang) && (self.version == "*" || self.version == version)
    }

    /// Segment-wise prefix match: `ref` matches `ref` and `ref/models`, never
    /// `reference` or `refs/x`.
    fn matches_path(&self, path: &str) -> bool {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        self.prefix
            .iter()
            .all(|want| segments.next().is_some_and(|seg| seg == want))
    }
}

/// The full exclusion list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exclusions {
    rules: Vec<ExclusionRule>,
}

impl Exclusions {
    pub fn parse(content: &str) -> Self {
        Self {
            rules: content.lines().filter_map(ExclusionRule::parse).collect(),
        }
    }

    /// Read the list from `path`. A missing file means nothing is excluded.
    pub async fn load(path: &Path) -> std::io::Result<Self> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(Self::parse(&content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "exclusion list not found, indexing everything");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    pub fn rules(&self) -> &[ExclusionRule] {
        &self.rules
    }

    /// Whether a normalized document path of the given docs must be skipped.
    pub fn is_excluded(&self, lang: &str, version: &str, path: &str) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.applies_to(lang, version) && rule.matches_path(path))
    }
}
