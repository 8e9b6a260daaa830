//! Data models for the activity widgets and the collection pipeline.

mod github_event;
mod payload;

pub use github_event::{GitHubEvent, GitHubEventPayload, GitHubEventRepo};
pub use payload::{ActivityPayload, ActivitySummary, DailyActivity, EventCountError};
