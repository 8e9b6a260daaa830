//! Public event records returned by the GitHub events API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Repository reference attached to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubEventRepo {
    /// Full `owner/name`.
    pub name: String,
}

/// The parts of an event payload the pipeline reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GitHubEventPayload {
    #[serde(default)]
    pub commits: Vec<serde_json::Value>,
}

/// A single entry from `/users/{user}/events/public`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitHubEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub created_at: DateTime<Utc>,
    pub repo: GitHubEventRepo,
    #[serde(default)]
    pub payload: GitHubEventPayload,
}

impl GitHubEvent {
    /// Number of commits carried by a push event; 0 for everything else.
    pub fn commit_count(&self) -> u64 {
        if self.event_type == "PushEvent" {
            self.payload.commits.len() as u64
        } else {
            0
        }
    }

    /// Day the event happened, `YYYY-MM-DD`.
    pub fn day(&self) -> String {
        self.created_at.format("%Y-%m-%d").to_string()
    }
}
