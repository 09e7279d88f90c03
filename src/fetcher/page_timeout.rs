//! Timeout wrapper for browser page operations
//!
//! Keeps "the operation ran out of time" distinct from "the operation
//! failed", since the fetcher reports them as different failure kinds.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageOpError {
    #[error("{operation} timeout after {}ms", after.as_millis())]
    TimedOut {
        operation: &'static str,
        after: Duration,
    },

    #[error("{operation} failed: {source}")]
    Failed {
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl PageOpError {
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }

    /// Full message chain, for classification only; never shown to callers
    #[must_use]
    pub fn chain_text(&self) -> String {
        match self {
            Self::TimedOut { .. } => self.to_string(),
            Self::Failed { source, .. } => format!("{source:#}"),
        }
    }
}

/// Run `operation` under `limit`
///
/// # Errors
///
/// `TimedOut` when the limit elapses first, `Failed` when the operation
/// itself returns an error.
pub async fn with_page_timeout<F, T, E>(
    operation: F,
    limit: Duration,
    operation_name: &'static str,
) -> Result<T, PageOpError>
where
    F: Future<Output = Result<T, E>>,
    E: Into<anyhow::Error>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(PageOpError::Failed {
            operation: operation_name,
            source: e.into(),
        }),
        Err(_) => Err(PageOpError::TimedOut {
            operation: operation_name,
            after: limit,
        }),
    }
}
