use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use docsite_core::config::{SearchConfig, SiteConfig};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server host to bind to.
    pub host: String,
    /// Server port to bind to.
    pub port: u16,
    /// SQLite connection URL, e.g. `sqlite:docs.db`.
    pub database_url: String,
    /// Maximum database connections in the pool.
    pub db_max_connections: u32,
    /// Root of the built documentation tree.
    pub build_root: PathBuf,
    /// Robots-style file of paths excluded from sync.
    pub exclusions_path: PathBuf,
    /// Repository the docs are built from.
    pub scm_url: String,
    pub default_language: String,
    pub default_search_config: SearchConfig,
    /// JWT signing secret for admin endpoints.
    pub jwt_secret: String,
    /// Event bus channel capacity.
    pub event_bus_capacity: usize,
    /// Log level (e.g., "info", "debug", "trace").
    pub log_level: String,
}

impl AppConfig {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key-value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let site = SiteConfig::default();
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            host: var("HOST", "0.0.0.0"),
            port: parse(&lookup, "PORT", 3030)?,
            database_url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            db_max_connections: parse(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            build_root: PathBuf::from(var("DOCS_BUILD_ROOT", "./build")),
            exclusions_path: PathBuf::from(var(
                "DOCS_EXCLUSIONS_PATH",
                "./static/robots.docs.txt",
            )),
            scm_url: var("DOCS_SCM_URL", &site.scm_url),
            default_language: var("DEFAULT_LANGUAGE", &site.default_language),
            default_search_config: parse(
                &lookup,
                "DEFAULT_SEARCH_CONFIG",
                site.default_search_config,
            )?,
            jwt_secret: lookup("JWT_SECRET")
                .filter(|secret| !secret.trim().is_empty())
                .ok_or(ConfigError::Missing("JWT_SECRET"))?,
            event_bus_capacity: parse(&lookup, "EVENT_BUS_CAPACITY", 1024)?,
            log_level: var("LOG_LEVEL", "info"),
        })
    }

    /// Build the socket address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Site settings handed to the docs stores.
    pub fn site_config(&self) -> SiteConfig {
        SiteConfig {
            default_language: self.default_language.clone(),
            default_search_config: self.default_search_config,
            build_root: self.build_root.clone(),
            exclusions_path: self.exclusions_path.clone(),
            scm_url: self.scm_url.clone(),
            ..SiteConfig::default()
        }
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
