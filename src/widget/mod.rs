//! GitHub activity widgets.
//!
//! An [`ActivityWidget`] reads the activity document once and applies two
//! independent fragments to a host page:
//! - the stats grid (four summary cells)
//! - the recent repositories list (up to five linked rows)
//!
//! Failures degrade silently: a failed load is logged and leaves both
//! containers as they were, and a missing container is skipped.

mod document;
mod error;
mod fragments;
mod source;

pub use document::{HostDocument, HtmlDocument};
pub use error::WidgetError;
pub use fragments::{
    RepoListFragment, RepoRow, StatCell, StatsFragment, GITHUB_BASE_URL, RECENT_REPO_LIMIT,
};
pub use source::{source_for_site, ActivitySource, FileSource, HttpSource, DEFAULT_DATA_PATH};

use std::sync::Arc;

use crate::models::ActivityPayload;

/// Default id of the stats grid container.
pub const DEFAULT_STATS_CONTAINER: &str = "github-stats";

/// Default id of the recent repositories container.
pub const DEFAULT_REPOS_CONTAINER: &str = "recent-repos";

/// Element ids the widgets render into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetTargets {
    pub stats: String,
    pub repos: String,
}

impl Default for WidgetTargets {
    fn default() -> Self {
        Self {
            stats: DEFAULT_STATS_CONTAINER.to_string(),
            repos: DEFAULT_REPOS_CONTAINER.to_string(),
        }
    }
}

/// Result of applying one widget to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The container was replaced with `items` cells or rows.
    Rendered { items: usize },
    /// The page has no container for this widget.
    MissingContainer,
}

/// What happened to one widget during a settled load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered { items: usize },
    MissingContainer,
    Malformed(String),
}

impl From<Applied> for RenderOutcome {
    fn from(applied: Applied) -> Self {
        match applied {
            Applied::Rendered { items } => Self::Rendered { items },
            Applied::MissingContainer => Self::MissingContainer,
        }
    }
}

/// Per-widget outcomes of a successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderReport {
    pub stats: RenderOutcome,
    pub repos: RenderOutcome,
}

/// Load state. `Rendered` and `Failed` are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetState {
    Pending,
    Rendered(RenderReport),
    Failed(String),
}

impl WidgetState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Loads the activity document and renders it into a host page.
pub struct ActivityWidget {
    source: Arc<dyn ActivitySource>,
    targets: WidgetTargets,
    state: WidgetState,
}

impl ActivityWidget {
    pub fn new(source: Arc<dyn ActivitySource>, targets: WidgetTargets) -> Self {
        Self {
            source,
            targets,
            state: WidgetState::Pending,
        }
    }

    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    pub fn targets(&self) -> &WidgetTargets {
        &self.targets
    }

    /// Fetch once and render both widgets into `doc`.
    ///
    /// A widget that has already settled returns its state without fetching again.
    pub async fn load<D: HostDocument>(&mut self, doc: &mut D) -> &WidgetState {
        if self.state.is_settled() {
            tracing::debug!("Activity widget already settled, skipping load");
            return &self.state;
        }

        let fetched = self.fetch_payload().await;
        self.settle(fetched, doc)
    }

    /// Read and parse the activity document.
    pub async fn fetch_payload(&self) -> Result<ActivityPayload, WidgetError> {
        let location = self.source.location();
        tracing::debug!("Fetching activity data from {}", location);

        let body = self.source.read().await?;
        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| WidgetError::unavailable(&location, format!("invalid JSON: {}", e)))?;

        serde_json::from_value(value).map_err(|e| WidgetError::MalformedPayload(e.to_string()))
    }

    /// Apply a fetch result to `doc` and move to a terminal state.
    pub fn settle<D: HostDocument>(
        &mut self,
        fetched: Result<ActivityPayload, WidgetError>,
        doc: &mut D,
    ) -> &WidgetState {
        if self.state.is_settled() {
            return &self.state;
        }

        self.state = match fetched {
            Ok(payload) => {
                let stats = outcome("stats", self.render_activity_stats(&payload, doc));
                let repos = outcome("repos", self.render_recent_repos(&payload, doc));
                WidgetState::Rendered(RenderReport { stats, repos })
            }
            Err(e) => {
                tracing::error!("Error loading GitHub activity: {}", e);
                WidgetState::Failed(e.to_string())
            }
        };

        &self.state
    }

    /// Render the stats grid into the stats container.
    pub fn render_activity_stats<D: HostDocument>(
        &self,
        payload: &ActivityPayload,
        doc: &mut D,
    ) -> Result<Applied, WidgetError> {
        if !doc.has_container(&self.targets.stats) {
            tracing::debug!("No #{} container, skipping stats", self.targets.stats);
            return Ok(Applied::MissingContainer);
        }

        let fragment = StatsFragment::project(payload)?;
        let markup = fragment.render()?;
        doc.replace_contents(&self.targets.stats, &markup);

        Ok(Applied::Rendered {
            items: fragment.cells.len(),
        })
    }

    /// Render the recent repositories list into the repos container.
    pub fn render_recent_repos<D: HostDocument>(
        &self,
        payload: &ActivityPayload,
        doc: &mut D,
    ) -> Result<Applied, WidgetError> {
        if !doc.has_container(&self.targets.repos) {
            tracing::debug!("No #{} container, skipping repos", self.targets.repos);
            return Ok(Applied::MissingContainer);
        }

        let fragment = RepoListFragment::project(payload)?;
        let markup = fragment.render()?;
        doc.replace_contents(&self.targets.repos, &markup);

        Ok(Applied::Rendered {
            items: fragment.rows.len(),
        })
    }
}

fn outcome(widget: &str, result: Result<Applied, WidgetError>) -> RenderOutcome {
    match result {
        Ok(applied) => applied.into(),
        Err(e) => {
            tracing::warn!("Skipping {} widget: {}", widget, e);
            RenderOutcome::Malformed(e.to_string())
        }
    }
}
