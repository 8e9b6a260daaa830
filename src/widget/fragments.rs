//! Pure projections from an [`ActivityPayload`] to widget markup.
//!
//! Projection and rendering never touch a document; applying the result to a
//! container is the job of [`super::HostDocument`].

use askama::Template;

use super::WidgetError;
use crate::models::ActivityPayload;

/// Maximum number of rows in the recent repositories list.
pub const RECENT_REPO_LIMIT: usize = 5;

/// Base URL that repository entries are linked under.
pub const GITHUB_BASE_URL: &str = "https://github.com";

/// One cell of the stats grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCell {
    pub value: u64,
    pub label: &'static str,
}

/// The four summary cells, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsFragment {
    pub cells: [StatCell; 4],
}

#[derive(Template)]
#[template(path = "activity_stats.html")]
struct StatsGridTemplate<'a> {
    cells: &'a [StatCell],
}

impl StatsFragment {
    /// Build the stats grid from a payload.
    ///
    /// Fails when the summary counts or the event breakdown are absent, or
    /// when a rendered count is not a non-negative integer. Missing event
    /// types inside the breakdown count as 0.
    pub fn project(payload: &ActivityPayload) -> Result<Self, WidgetError> {
        let summary = payload
            .summary
            .as_ref()
            .ok_or_else(|| WidgetError::MalformedPayload("missing summary".to_string()))?;
        let total_events = summary.total_events.ok_or_else(|| {
            WidgetError::MalformedPayload("missing summary.total_events".to_string())
        })?;
        let total_repos = summary.total_repos.ok_or_else(|| {
            WidgetError::MalformedPayload("missing summary.total_repos".to_string())
        })?;
        let push_events = payload
            .event_count("PushEvent")
            .map_err(|e| WidgetError::MalformedPayload(e.to_string()))?;
        let create_events = payload
            .event_count("CreateEvent")
            .map_err(|e| WidgetError::MalformedPayload(e.to_string()))?;

        Ok(Self {
            cells: [
                StatCell {
                    value: total_events,
                    label: "Recent Events",
                },
                StatCell {
                    value: total_repos,
                    label: "Active Repos",
                },
                StatCell {
                    value: push_events,
                    label: "Push Events",
                },
                StatCell {
                    value: create_events,
                    label: "New Branches",
                },
            ],
        })
    }

    pub fn render(&self) -> Result<String, WidgetError> {
        Ok(StatsGridTemplate { cells: &self.cells }.render()?)
    }
}

/// A linked repository in the recent list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRow {
    /// Display label, the part after the owner.
    pub name: String,
    pub url: String,
}

impl RepoRow {
    /// Build a row from an `owner/name` entry.
    ///
    /// Entries without a `/` are shown whole rather than dropped.
    pub fn from_full_name(full_name: &str) -> Self {
        let name = match full_name.split_once('/') {
            Some((_, name)) => name,
            None => full_name,
        };
        Self {
            name: name.to_string(),
            url: format!("{}/{}", GITHUB_BASE_URL, full_name),
        }
    }
}

/// Rows of the recent repositories list, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoListFragment {
    pub rows: Vec<RepoRow>,
}

#[derive(Template)]
#[template(path = "recent_repos.html")]
struct RecentReposTemplate<'a> {
    rows: &'a [RepoRow],
}

impl RepoListFragment {
    /// Build the list from the first [`RECENT_REPO_LIMIT`] repository entries.
    pub fn project(payload: &ActivityPayload) -> Result<Self, WidgetError> {
        let repos = payload
            .repos
            .as_ref()
            .ok_or_else(|| WidgetError::MalformedPayload("missing repos".to_string()))?;

        Ok(Self {
            rows: repos
                .iter()
                .take(RECENT_REPO_LIMIT)
                .map(|repo| RepoRow::from_full_name(repo))
                .collect(),
        })
    }

    pub fn render(&self) -> Result<String, WidgetError> {
        Ok(RecentReposTemplate { rows: &self.rows }.render()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivitySummary;
    use scraper::{Html, Selector};
    use std::collections::BTreeMap;

    fn payload(breakdown: &[(&str, u64)], repos: &[&str]) -> ActivityPayload {
        ActivityPayload {
            summary: Some(ActivitySummary {
                total_events: Some(42),
                total_repos: Some(7),
                ..Default::default()
            }),
            event_breakdown: Some(
                breakdown
                    .iter()
                    .map(|(k, v)| (k.to_string(), serde_json::Value::from(*v)))
                    .collect::<BTreeMap<_, _>>(),
            ),
            repos: Some(repos.iter().map(|r| r.to_string()).collect()),
            ..Default::default()
        }
    }

    #[test]
    fn test_stats_cells_fixed_order() {
        let fragment =
            StatsFragment::project(&payload(&[("PushEvent", 30), ("CreateEvent", 3)], &[]))
                .unwrap();

        let values: Vec<u64> = fragment.cells.iter().map(|c| c.value).collect();
        let labels: Vec<&str> = fragment.cells.iter().map(|c| c.label).collect();
        assert_eq!(values, vec![42, 7, 30, 3]);
        assert_eq!(
            labels,
            vec!["Recent Events", "Active Repos", "Push Events", "New Branches"]
        );
    }

    #[test]
    fn test_stats_default_missing_event_types_to_zero() {
        let fragment = StatsFragment::project(&payload(&[], &[])).unwrap();
        assert_eq!(fragment.cells[2].value, 0);
        assert_eq!(fragment.cells[3].value, 0);
    }

    #[test]
    fn test_stats_require_summary_and_breakdown() {
        let mut no_summary = payload(&[], &[]);
        no_summary.summary = None;
        assert!(StatsFragment::project(&no_summary)
            .unwrap_err()
            .is_malformed());

        let mut no_breakdown = payload(&[], &[]);
        no_breakdown.event_breakdown = None;
        assert!(StatsFragment::project(&no_breakdown)
            .unwrap_err()
            .is_malformed());

        let mut no_total = payload(&[], &[]);
        no_total.summary = Some(ActivitySummary {
            total_repos: Some(1),
            ..Default::default()
        });
        assert!(StatsFragment::project(&no_total).unwrap_err().is_malformed());
    }

    #[test]
    fn test_stats_reject_non_count_push_events() {
        let mut bad = payload(&[], &[]);
        bad.event_breakdown = Some(BTreeMap::from([(
            "PushEvent".to_string(),
            serde_json::json!("thirty"),
        )]));
        let err = StatsFragment::project(&bad).unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("PushEvent"));
    }

    #[test]
    fn test_stats_ignore_unrendered_breakdown_entries() {
        let mut noisy = payload(&[("PushEvent", 2)], &[]);
        if let Some(breakdown) = noisy.event_breakdown.as_mut() {
            breakdown.insert("note".to_string(), serde_json::json!("n/a"));
        }
        let fragment = StatsFragment::project(&noisy).unwrap();
        assert_eq!(fragment.cells[2].value, 2);
    }

    #[test]
    fn test_repo_row_from_full_name() {
        let row = RepoRow::from_full_name("octocat/Hello-World");
        assert_eq!(row.name, "Hello-World");
        assert_eq!(row.url, "https://github.com/octocat/Hello-World");
    }

    #[test]
    fn test_repo_row_without_separator_uses_whole_string() {
        let row = RepoRow::from_full_name("standalone");
        assert_eq!(row.name, "standalone");
        assert_eq!(row.url, "https://github.com/standalone");
    }

    #[test]
    fn test_repo_row_splits_on_first_separator() {
        let row = RepoRow::from_full_name("owner/name/extra");
        assert_eq!(row.name, "name/extra");
    }

    #[test]
    fn test_repo_list_truncates_and_keeps_order() {
        let fragment = RepoListFragment::project(&payload(
            &[],
            &["a/one", "a/two", "b/three", "c/four", "c/five", "d/six"],
        ))
        .unwrap();

        let names: Vec<&str> = fragment.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["one", "two", "three", "four", "five"]);
    }

    #[test]
    fn test_repo_list_shorter_than_limit() {
        let fragment = RepoListFragment::project(&payload(&[], &["a/one", "b/two"])).unwrap();
        assert_eq!(fragment.rows.len(), 2);
    }

    #[test]
    fn test_repo_list_requires_repos() {
        let mut no_repos = payload(&[], &[]);
        no_repos.repos = None;
        assert!(RepoListFragment::project(&no_repos)
            .unwrap_err()
            .is_malformed());
    }

    #[test]
    fn test_render_stats_markup() {
        let html = StatsFragment::project(&payload(&[("PushEvent", 30)], &[]))
            .unwrap()
            .render()
            .unwrap();
        let fragment = Html::parse_fragment(&html);

        let grid = Selector::parse(".stats-grid").unwrap();
        assert_eq!(fragment.select(&grid).count(), 1);

        let numbers = Selector::parse(".stat-card .stat-number").unwrap();
        let values: Vec<String> = fragment
            .select(&numbers)
            .map(|n| n.text().collect::<String>())
            .collect();
        assert_eq!(values, vec!["42", "7", "30", "0"]);
    }

    #[test]
    fn test_render_repos_markup() {
        let html = RepoListFragment::project(&payload(&[], &["octocat/Hello-World"]))
            .unwrap()
            .render()
            .unwrap();
        let fragment = Html::parse_fragment(&html);

        let items = Selector::parse(".repo-item").unwrap();
        assert_eq!(fragment.select(&items).count(), 1);
        let icons = Selector::parse(".repo-item svg").unwrap();
        assert_eq!(fragment.select(&icons).count(), 1);

        let link_selector = Selector::parse(".repo-item a").unwrap();
        let link = fragment.select(&link_selector).next().unwrap();
        assert_eq!(
            link.value().attr("href"),
            Some("https://github.com/octocat/Hello-World")
        );
        assert_eq!(link.value().attr("target"), Some("_blank"));
        assert_eq!(link.text().collect::<String>(), "Hello-World");
    }

    #[test]
    fn test_render_escapes_repo_names() {
        let html = RepoListFragment::project(&payload(&[], &["evil/<script>"]))
            .unwrap()
            .render()
            .unwrap();
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_render_empty_repo_list() {
        let html = RepoListFragment::default().render().unwrap();
        assert!(html.trim().is_empty());
    }
}
