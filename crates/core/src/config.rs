use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Text search configuration of a document: which tokenizer builds its
/// search vector and parses queries against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchConfig {
    /// Porter-stemmed English.
    English,
    /// Lowercased tokens, no stemming.
    Simple,
}

impl SearchConfig {
    pub const ALL: [SearchConfig; 2] = [SearchConfig::English, SearchConfig::Simple];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchConfig::English => "english",
            SearchConfig::Simple => "simple",
        }
    }

    /// FTS5 table holding search vectors built with this configuration.
    pub fn table(&self) -> &'static str {
        match self {
            SearchConfig::English => "document_search_english",
            SearchConfig::Simple => "document_search_simple",
        }
    }
}

impl fmt::Display for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchConfig {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "english" => Ok(SearchConfig::English),
            "simple" => Ok(SearchConfig::Simple),
            other => Err(format!("unknown text search configuration: {other}")),
        }
    }
}

/// Site-wide settings for the documentation subsystem.
///
/// Built once at startup and handed to the stores; nothing reads it from
/// global state.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Language of the canonical docs, used by the version switcher.
    pub default_language: String,
    /// Configuration for languages without a dedicated one.
    pub default_search_config: SearchConfig,
    /// Two-letter language code to search configuration.
    pub search_languages: HashMap<String, SearchConfig>,
    /// Root of the built documentation tree (`{root}/{lang}/{version}/_built/json`).
    pub build_root: PathBuf,
    /// Robots-style file listing paths that must not be indexed.
    pub exclusions_path: PathBuf,
    /// Repository URL the docs are built from.
    pub scm_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            default_language: "en".to_string(),
            default_search_config: SearchConfig::Simple,
            search_languages: HashMap::from([("en".to_string(), SearchConfig::English)]),
            build_root: PathBuf::from("build"),
            exclusions_path: PathBuf::from("static/robots.docs.txt"),
            scm_url: "https://github.com/django/django.git".to_string(),
        }
    }
}

impl SiteConfig {
    /// Search configuration for a language code such as `en` or `pt-br`.
    pub fn search_config_for(&self, lang: &str) -> SearchConfig {
        let prefix: String = lang.chars().take(2).collect();
        self.search_languages
            .get(&prefix)
            .copied()
            .unwrap_or(self.default_search_config)
    }

    /// Parse a stored configuration name, falling back to the site default.
    pub fn resolve_search_config(&self, name: &str) -> SearchConfig {
        name.parse().unwrap_or(self.default_search_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_prefix_selects_config() {
        let config = SiteConfig::default();
        assert_eq!(config.search_config_for("en"), SearchConfig::English);
        assert_eq!(config.search_config_for("en-gb"), SearchConfig::English);
        assert_eq!(config.search_config_for("fr"), SearchConfig::Simple);
    }

    #[test]
    fn unknown_config_name_falls_back_to_default() {
        let config = SiteConfig::default();
        assert_eq!(config.resolve_search_config("english"), SearchConfig::English);
        assert_eq!(config.resolve_search_config("french"), SearchConfig::Simple);
    }
}
