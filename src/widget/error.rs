//! Errors raised while loading or rendering the activity widgets.

use thiserror::Error;

/// Errors that can occur while loading or rendering activity widgets.
///
/// A missing container is not an error; see [`super::Applied::MissingContainer`].
#[derive(Debug, Error)]
pub enum WidgetError {
    /// The activity document could not be read or is not JSON.
    #[error("Activity data unavailable from {location}: {reason}")]
    DataUnavailable { location: String, reason: String },

    /// The document parsed but lacks fields a widget needs.
    #[error("Malformed activity payload: {0}")]
    MalformedPayload(String),

    #[error("Template rendering failed: {0}")]
    Template(#[from] askama::Error),
}

impl WidgetError {
    pub(crate) fn unavailable(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::DataUnavailable {
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, Self::DataUnavailable { .. })
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedPayload(_))
    }
}
