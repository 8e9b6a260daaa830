//! The activity document rendered by the widgets.
//!
//! Every field the widgets read is optional so that a partial document still
//! deserializes; each widget decides for itself whether what it needs is there.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Aggregate counts over the collection window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySummary {
    /// Number of recent public events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_events: Option<u64>,
    /// Number of distinct repositories touched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_repos: Option<u64>,
    /// Number of commits pushed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_commits: Option<u64>,
    /// Event type with the highest count.
    #[serde(default)]
    pub most_active_event: Option<String>,
}

/// Commits pushed on a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyActivity {
    /// Day in `YYYY-MM-DD` form.
    pub date: String,
    pub commits: u64,
}

/// Parsed contents of `data/github_activity.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<ActivitySummary>,
    /// Occurrences per event type name (`PushEvent`, `CreateEvent`, ...).
    ///
    /// Values stay untyped until read so an entry nobody renders cannot
    /// fail the whole document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_breakdown: Option<BTreeMap<String, Value>>,
    /// `owner/name` entries, most recent first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repos: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub daily_activity: Vec<DailyActivity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

/// Why an event count could not be read from the breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventCountError {
    #[error("missing event_breakdown")]
    MissingBreakdown,
    #[error("event_breakdown.{0} is not a count")]
    NotACount(String),
}

impl ActivityPayload {
    /// Count recorded for an event type, or 0 when the type is not listed.
    pub fn event_count(&self, event_type: &str) -> Result<u64, EventCountError> {
        let breakdown = self
            .event_breakdown
            .as_ref()
            .ok_or(EventCountError::MissingBreakdown)?;
        match breakdown.get(event_type) {
            None => Ok(0),
            Some(value) => value
                .as_u64()
                .ok_or_else(|| EventCountError::NotACount(event_type.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_generator_output() {
        let json = r#"{
            "summary": {
                "total_commits": 12,
                "total_repos": 2,
                "total_events": 5,
                "most_active_event": "PushEvent"
            },
            "daily_activity": [{"date": "2024-05-01", "commits": 12}],
            "event_breakdown": {"PushEvent": 4, "WatchEvent": 1},
            "repos": ["octocat/Hello-World", "octocat/Spoon-Knife"],
            "last_updated": "2024-05-02T10:00:00"
        }"#;

        let payload: ActivityPayload = serde_json::from_str(json).unwrap();
        let summary = payload.summary.as_ref().unwrap();
        assert_eq!(summary.total_events, Some(5));
        assert_eq!(summary.total_repos, Some(2));
        assert_eq!(summary.most_active_event.as_deref(), Some("PushEvent"));
        assert_eq!(payload.daily_activity.len(), 1);
        assert_eq!(payload.repos.as_ref().unwrap().len(), 2);
        assert_eq!(payload.event_count("PushEvent"), Ok(4));
    }

    #[test]
    fn test_missing_sections_deserialize_as_none() {
        let payload: ActivityPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.summary.is_none());
        assert!(payload.event_breakdown.is_none());
        assert!(payload.repos.is_none());
        assert_eq!(
            payload.event_count("PushEvent"),
            Err(EventCountError::MissingBreakdown)
        );
    }

    #[test]
    fn test_event_count_uses_presence_not_value() {
        let payload: ActivityPayload =
            serde_json::from_str(r#"{"event_breakdown": {"PushEvent": 0}}"#).unwrap();
        assert_eq!(payload.event_count("PushEvent"), Ok(0));
        assert_eq!(payload.event_count("CreateEvent"), Ok(0));
    }

    #[test]
    fn test_unrelated_breakdown_entries_still_parse() {
        let payload: ActivityPayload = serde_json::from_str(
            r#"{"event_breakdown": {"PushEvent": 1, "note": "n/a"}, "repos": ["a/one"]}"#,
        )
        .unwrap();
        assert_eq!(payload.event_count("PushEvent"), Ok(1));
        assert_eq!(
            payload.event_count("note"),
            Err(EventCountError::NotACount("note".to_string()))
        );
    }

    #[test]
    fn test_event_count_rejects_non_integer_values() {
        let payload: ActivityPayload =
            serde_json::from_str(r#"{"event_breakdown": {"PushEvent": -3, "CreateEvent": 1.5}}"#)
                .unwrap();
        assert!(payload.event_count("PushEvent").is_err());
        assert!(payload.event_count("CreateEvent").is_err());
    }

    #[test]
    fn test_negative_count_is_rejected() {
        let result: Result<ActivityPayload, _> =
            serde_json::from_str(r#"{"summary": {"total_events": -1}}"#);
        assert!(result.is_err());
    }
}
