//! Per-side fetch results
//!
//! A fetch never returns a raw library error to the caller. Failures are
//! classified into [`FetchErrorKind`] and carry a short, user-safe message
//! that always starts with `Error:`.

use serde::{Deserialize, Serialize};

/// Failure categories surfaced by the fetcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    DnsResolution,
    ConnectionRefused,
    NavigationTimeout,
    HttpStatus,
    ContentExtraction,
    SizeLimitExceeded,
    Unexpected,
}

impl FetchErrorKind {
    /// Stable snake-case label for logs and API consumers
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::DnsResolution => "dns_resolution_failure",
            Self::ConnectionRefused => "connection_refused",
            Self::NavigationTimeout => "navigation_timeout",
            Self::HttpStatus => "http_status_error",
            Self::ContentExtraction => "content_extraction_failure",
            Self::SizeLimitExceeded => "size_limit_exceeded",
            Self::Unexpected => "unexpected_error",
        }
    }

    /// Classify a network-level error by its rendered message chain
    ///
    /// Both reqwest and Chrome report resolver and connect failures as text;
    /// anything unrecognised is `Unexpected`.
    #[must_use]
    pub fn from_network_message(message: &str) -> Self {
        let lower = message.to_ascii_lowercase();
        if lower.contains("err_name_not_resolved")
            || lower.contains("failed to lookup")
            || lower.contains("dns error")
            || lower.contains("name or service not known")
            || lower.contains("no such host")
        {
            Self::DnsResolution
        } else if lower.contains("err_connection_refused") || lower.contains("connection refused")
        {
            Self::ConnectionRefused
        } else if lower.contains("err_timed_out") || lower.contains("timed out") {
            Self::NavigationTimeout
        } else {
            Self::Unexpected
        }
    }
}

impl std::fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of fetching one URL: content or a classified failure, never both
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchOutcome {
    Success { text: String },
    Failure { kind: FetchErrorKind, message: String },
}

impl FetchOutcome {
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self::Success { text: text.into() }
    }

    #[must_use]
    pub fn failure(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn timeout(url: &str, after: std::time::Duration) -> Self {
        Self::failure(
            FetchErrorKind::NavigationTimeout,
            format!(
                "Error: Page load timed out after {}s for {url}",
                after.as_secs().max(1)
            ),
        )
    }

    #[must_use]
    pub fn http_status(url: &str, status: u16, reason: Option<&str>) -> Self {
        let reason = reason
            .filter(|r| !r.is_empty())
            .map(|r| format!(". Reason: {r}"))
            .unwrap_or_default();
        Self::failure(
            FetchErrorKind::HttpStatus,
            format!("Error: HTTP Error {status} for {url}{reason}"),
        )
    }

    #[must_use]
    pub fn size_limit(url: &str, limit: usize) -> Self {
        Self::failure(
            FetchErrorKind::SizeLimitExceeded,
            format!(
                "Error: Content exceeds size limit ({}) for {url}.",
                human_size(limit)
            ),
        )
    }

    /// Failure whose message is derived from the kind alone
    #[must_use]
    pub fn classified(kind: FetchErrorKind, url: &str) -> Self {
        let message = match kind {
            FetchErrorKind::DnsResolution => format!("Error: Could not resolve hostname for {url}"),
            FetchErrorKind::ConnectionRefused => format!("Error: Connection refused for {url}"),
            FetchErrorKind::NavigationTimeout => format!("Error: Page load timed out for {url}"),
            FetchErrorKind::HttpStatus => format!("Error: HTTP Error for {url}"),
            FetchErrorKind::ContentExtraction => {
                format!("Error: Failed to extract page content from {url}")
            }
            FetchErrorKind::SizeLimitExceeded => {
                format!("Error: Content exceeds size limit for {url}.")
            }
            FetchErrorKind::Unexpected => format!("Error: Unexpected error processing {url}"),
        };
        Self::failure(kind, message)
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Success { text } => Some(text),
            Self::Failure { .. } => None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> Option<FetchErrorKind> {
        match self {
            Self::Failure { kind, .. } => Some(*kind),
            Self::Success { .. } => None,
        }
    }
}

fn human_size(bytes: usize) -> String {
    const MIB: usize = 1024 * 1024;
    const KIB: usize = 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else if bytes >= KIB && bytes % KIB == 0 {
        format!("{}KB", bytes / KIB)
    } else {
        format!("{bytes} bytes")
    }
}
