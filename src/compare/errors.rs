//! Comparison error taxonomy
//!
//! Every variant renders a short message that is safe to show to the person
//! who asked for the comparison. Library error text never ends up here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fetcher::{FetchErrorKind, FetchOutcome};
use crate::utils::PROCESSING_ERROR_MESSAGE;

/// Which side of a comparison an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Archived,
    Live,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Archived => "archived",
            Self::Live => "live",
        })
    }
}

/// Result type alias for comparison operations
pub type CompareResult<T> = Result<T, CompareError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompareError {
    /// URL rejected by the allow-list before any network access
    #[error("{}", validation_message(*side, live_domain))]
    Validation { side: Side, live_domain: String },

    /// DNS, connection or HTTP status failure
    #[error("{message}")]
    Network {
        kind: FetchErrorKind,
        message: String,
    },

    /// Navigation did not finish in time
    #[error("{message}")]
    Timeout { message: String },

    /// Browser or content extraction failure
    #[error("{message}")]
    Render {
        kind: FetchErrorKind,
        message: String,
    },

    /// Fetched document larger than the configured ceiling
    #[error("{message}")]
    SizeLimitExceeded { limit: usize, message: String },

    /// Failure after both sides were fetched successfully
    #[error("{}", PROCESSING_ERROR_MESSAGE)]
    DiffProcessing,
}

fn validation_message(side: Side, live_domain: &str) -> String {
    match side {
        Side::Archived => "Error: Invalid or disallowed URL for archived content.".to_string(),
        Side::Live => {
            format!("Error: Invalid or disallowed URL for live content (must be {live_domain}).")
        }
    }
}

impl CompareError {
    /// Classify a failed fetch; `None` for a successful outcome
    #[must_use]
    pub fn from_outcome(outcome: &FetchOutcome, size_limit: usize) -> Option<Self> {
        let FetchOutcome::Failure { kind, message } = outcome else {
            return None;
        };
        let message = message.clone();
        Some(match kind {
            FetchErrorKind::DnsResolution
            | FetchErrorKind::ConnectionRefused
            | FetchErrorKind::HttpStatus => Self::Network {
                kind: *kind,
                message,
            },
            FetchErrorKind::NavigationTimeout => Self::Timeout { message },
            FetchErrorKind::SizeLimitExceeded => Self::SizeLimitExceeded {
                limit: size_limit,
                message,
            },
            FetchErrorKind::ContentExtraction | FetchErrorKind::Unexpected => Self::Render {
                kind: *kind,
                message,
            },
        })
    }

    /// Stable category label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::Network { .. } => "network_error",
            Self::Timeout { .. } => "timeout_error",
            Self::Render { .. } => "render_error",
            Self::SizeLimitExceeded { .. } => "size_limit_exceeded",
            Self::DiffProcessing => "diff_processing_error",
        }
    }
}
