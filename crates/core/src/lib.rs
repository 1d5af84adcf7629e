//! Documentation releases, their rendered pages and full-text search.

pub mod builds;
pub mod config;
pub mod db;
pub mod doc_release;
pub mod document;
pub mod error;
pub mod events;
pub mod exclusions;
pub mod html;
pub mod release;

pub use config::{SearchConfig, SiteConfig};
pub use error::{CoreError, Result};
