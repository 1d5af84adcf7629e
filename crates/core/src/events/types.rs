use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events emitted after a docs release or the search index changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DocsEvent {
    ReleaseSynced(ReleaseSyncedEvent),
    #[serde(rename_all = "camelCase")]
    SearchIndexUpdated { count: u64, timestamp: DateTime<Utc> },
    #[serde(rename_all = "camelCase")]
    SearchIndexReset { count: u64, timestamp: DateTime<Utc> },
}

impl DocsEvent {
    pub fn search_index_updated(count: u64) -> Self {
        DocsEvent::SearchIndexUpdated {
            count,
            timestamp: Utc::now(),
        }
    }

    pub fn search_index_reset(count: u64) -> Self {
        DocsEvent::SearchIndexReset {
            count,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseSyncedEvent {
    pub sync_id: Uuid,
    pub lang: String,
    pub version: String,
    pub created: usize,
    pub skipped: usize,
    pub timestamp: DateTime<Utc>,
}
