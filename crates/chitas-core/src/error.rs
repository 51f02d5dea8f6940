//! Error kinds surfaced by the content pipeline

use thiserror::Error;

/// Failures of the remote content pipeline.
///
/// None of these are fatal to a session: callers decide whether to show a
/// banner, an inline message, or simply skip the affected summary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    /// Non-2xx status, transport failure, or an undecodable body.
    #[error("request to {url} failed: {message}")]
    Network {
        url: String,
        status: Option<u16>,
        message: String,
    },

    /// The secondary date-localization request failed. Degrades to the raw date.
    #[error("could not localize date {date}: {message}")]
    DateConversion { date: String, message: String },

    /// Nothing to show: no feed item for a category, or an empty text response.
    #[error("no content available for {subject}")]
    NoContent { subject: String },
}

impl ContentError {
    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        Self::Network {
            url: url.to_string(),
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }

    pub fn no_content(subject: impl Into<String>) -> Self {
        Self::NoContent {
            subject: subject.into(),
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}
