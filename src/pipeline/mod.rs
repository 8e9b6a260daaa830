//! GitHub activity collection.
//!
//! Extracts recent public events for an account, aggregates them into an
//! [`ActivityPayload`], and writes the document the widgets read.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{bail, Context};
use chrono::{DateTime, Duration, Utc};

use crate::http_client::HttpClient;
use crate::models::{ActivityPayload, ActivitySummary, DailyActivity, GitHubEvent};

/// Collects public GitHub events for one account.
pub struct ActivityPipeline {
    client: HttpClient,
    api_url: String,
    username: String,
    token: Option<String>,
}

impl ActivityPipeline {
    pub fn new(
        client: HttpClient,
        api_url: &str,
        username: &str,
        token: Option<String>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            token,
        }
    }

    /// Fetch public events newer than `days` ago.
    pub async fn extract_events(&self, days: u64) -> anyhow::Result<Vec<GitHubEvent>> {
        let cutoff = lookback_cutoff(Utc::now(), days)?;
        let url = format!(
            "{}/users/{}/events/public?per_page=100",
            self.api_url, self.username
        );

        let authorization = self.token.as_ref().map(|t| format!("token {}", t));
        let mut headers = vec![("Accept", "application/vnd.github.v3+json")];
        if let Some(ref auth) = authorization {
            headers.push(("Authorization", auth.as_str()));
        }

        let response = self
            .client
            .get_with_headers(&url, &headers)
            .await
            .with_context(|| format!("Failed to fetch events for {}", self.username))?;

        if !response.is_success() {
            bail!(
                "GitHub API returned {} for {}",
                response.status,
                self.username
            );
        }
        if let Some(remaining) = response.rate_limit_remaining() {
            tracing::debug!("GitHub API requests remaining: {}", remaining);
        }

        let body = response.text().await?;
        let events: Vec<GitHubEvent> =
            serde_json::from_str(&body).context("Failed to parse GitHub events")?;

        Ok(filter_since(events, cutoff))
    }

    /// Extract, transform, and write the activity document.
    pub async fn run(&self, output_path: &Path, days: u64) -> anyhow::Result<ActivityPayload> {
        tracing::info!(
            "Collecting GitHub activity for @{} over {} days",
            self.username,
            days
        );

        let events = self.extract_events(days).await?;
        tracing::info!("Extracted {} events", events.len());

        let payload = transform_events(&events, Utc::now());
        write_payload(&payload, output_path).await?;

        Ok(payload)
    }
}

/// Start of a collection window of `days` ending at `now`.
pub fn lookback_cutoff(now: DateTime<Utc>, days: u64) -> anyhow::Result<DateTime<Utc>> {
    let window = i64::try_from(days)
        .ok()
        .and_then(Duration::try_days)
        .with_context(|| format!("Lookback of {} days is out of range", days))?;
    now.checked_sub_signed(window)
        .with_context(|| format!("Lookback of {} days is out of range", days))
}

/// Keep events created strictly after `cutoff`.
pub fn filter_since(events: Vec<GitHubEvent>, cutoff: DateTime<Utc>) -> Vec<GitHubEvent> {
    events
        .into_iter()
        .filter(|event| event.created_at > cutoff)
        .collect()
}

/// Aggregate raw events into the activity document.
///
/// Events are expected newest first, as the API returns them, so the repo
/// list comes out most recent first.
pub fn transform_events(events: &[GitHubEvent], now: DateTime<Utc>) -> ActivityPayload {
    let mut event_types: BTreeMap<String, u64> = BTreeMap::new();
    let mut commits_by_date: BTreeMap<String, u64> = BTreeMap::new();
    let mut seen = HashSet::new();
    let mut repos = Vec::new();

    for event in events {
        *event_types.entry(event.event_type.clone()).or_insert(0) += 1;

        if seen.insert(event.repo.name.as_str()) {
            repos.push(event.repo.name.clone());
        }

        if event.event_type == "PushEvent" {
            *commits_by_date.entry(event.day()).or_insert(0) += event.commit_count();
        }
    }

    // Ties go to the alphabetically first type
    let most_active_event = event_types
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(name, _)| name.clone());

    let total_commits = commits_by_date.values().sum();
    let daily_activity = commits_by_date
        .into_iter()
        .map(|(date, commits)| DailyActivity { date, commits })
        .collect();

    ActivityPayload {
        summary: Some(ActivitySummary {
            total_events: Some(events.len() as u64),
            total_repos: Some(repos.len() as u64),
            total_commits: Some(total_commits),
            most_active_event,
        }),
        event_breakdown: Some(
            event_types
                .into_iter()
                .map(|(name, count)| (name, count.into()))
                .collect(),
        ),
        repos: Some(repos),
        daily_activity,
        last_updated: Some(now.to_rfc3339()),
    }
}

/// Write the document as pretty JSON, creating parent directories.
pub async fn write_payload(payload: &ActivityPayload, output_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create directory '{}'", parent.display())
            })?;
        }
    }

    let json = serde_json::to_string_pretty(payload)?;
    tokio::fs::write(output_path, json)
        .await
        .with_context(|| format!("Failed to write '{}'", output_path.display()))?;

    if let Some(ref summary) = payload.summary {
        tracing::info!(
            "Saved {} (commits: {}, repos: {})",
            output_path.display(),
            summary.total_commits.unwrap_or(0),
            summary.total_repos.unwrap_or(0)
        );
    }
    Ok(())
}
