//! One comparison call, start to finish
//!
//! ```text
//! Validating -> Rejected
//!            -> Fetching -> PartialFailure
//!                        -> Extracting -> Diffing -> Formatting -> Done
//! ```
//!
//! Both fetches run to completion independently. Nothing past validation can
//! escape as an error: fetch failures, task panics and processing failures
//! all end in a [`ComparisonResult`] with `is_error` set.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::errors::{CompareError, CompareResult, Side};
use super::result::{ComparisonRequest, ComparisonResult};
use crate::config::CompareConfig;
use crate::diff_engine::diff;
use crate::fetcher::{Fetch, FetchErrorKind, FetchOutcome, Fetcher};
use crate::output::{DiffOutput, formatter_for};
use crate::text_extractor::{TextUnit, extract};

/// Orchestrator stages, logged as the call progresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Rejected,
    Fetching,
    PartialFailure,
    Extracting,
    Diffing,
    Formatting,
    Done,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::Rejected => "rejected",
            Self::Fetching => "fetching",
            Self::PartialFailure => "partial_failure",
            Self::Extracting => "extracting",
            Self::Diffing => "diffing",
            Self::Formatting => "formatting",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

struct Processed {
    lines_a: Vec<TextUnit>,
    lines_b: Vec<TextUnit>,
    output: DiffOutput,
}

/// Runs comparisons against a shared configuration and fetcher
///
/// Cheap to clone; clones share the fetcher, and with it the process-wide
/// bound on rendering sessions.
pub struct Comparator<F: Fetch = Fetcher> {
    config: Arc<CompareConfig>,
    fetcher: Arc<F>,
}

impl<F: Fetch> Clone for Comparator<F> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            fetcher: Arc::clone(&self.fetcher),
        }
    }
}

impl Comparator<Fetcher> {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: CompareConfig) -> anyhow::Result<Self> {
        let fetcher = Fetcher::new(&config)?;
        Ok(Self::with_fetcher(config, fetcher))
    }
}

impl<F: Fetch> Comparator<F> {
    pub fn with_fetcher(config: CompareConfig, fetcher: F) -> Self {
        Self {
            config: Arc::new(config),
            fetcher: Arc::new(fetcher),
        }
    }

    #[must_use]
    pub fn config(&self) -> &CompareConfig {
        &self.config
    }

    /// Compare an archived page against its live counterpart
    pub async fn compare(&self, request: &ComparisonRequest) -> ComparisonResult {
        let mode = self.config.output_mode();
        info!(
            archived = %request.archived_url,
            live = %request.live_url,
            "Starting comparison"
        );

        debug!(stage = %Stage::Validating);
        if let Err((side, err)) = self.validate(request) {
            warn!(stage = %Stage::Rejected, side = %side, "SSRF prevented: URL rejected");
            return ComparisonResult::rejected(mode, side, &err);
        }

        debug!(stage = %Stage::Fetching);
        let (outcome_a, outcome_b) = self.fetch_both(request).await;

        let limit = self.config.fetch().max_content_bytes();
        let error_a = CompareError::from_outcome(&outcome_a, limit);
        let error_b = CompareError::from_outcome(&outcome_b, limit);
        if error_a.is_some() || error_b.is_some() {
            if let Some(e) = &error_a {
                error!(side = %Side::Archived, kind = e.label(), "Fetch error: {e}");
            }
            if let Some(e) = &error_b {
                error!(side = %Side::Live, kind = e.label(), "Fetch error: {e}");
            }
            debug!(stage = %Stage::PartialFailure);
            return ComparisonResult::failure(mode, error_a.as_ref(), error_b.as_ref());
        }

        let (FetchOutcome::Success { text: text_a }, FetchOutcome::Success { text: text_b }) =
            (outcome_a, outcome_b)
        else {
            // both outcomes were checked for failure above
            let mut result = ComparisonResult::failure(mode, None, None);
            result.mark_processing_error();
            return result;
        };

        let config = Arc::clone(&self.config);
        let processed =
            tokio::task::spawn_blocking(move || process(&config, &text_a, &text_b)).await;

        match processed {
            Ok(Ok(p)) => {
                debug!(stage = %Stage::Done);
                ComparisonResult::success(p.lines_a, p.lines_b, p.output)
            }
            Ok(Err(e)) => {
                error!("Error during diff processing: {e}");
                let mut result = ComparisonResult::failure(mode, None, None);
                result.mark_processing_error();
                result
            }
            Err(e) => {
                error!("Diff processing task failed: {e}");
                let mut result = ComparisonResult::failure(mode, None, None);
                result.mark_processing_error();
                result
            }
        }
    }

    /// Archived side first; the first failing side short-circuits
    fn validate(&self, request: &ComparisonRequest) -> Result<(), (Side, CompareError)> {
        let policy = self.config.url_policy();
        let rejected = |side| {
            (
                side,
                CompareError::Validation {
                    side,
                    live_domain: self.config.live_domain().to_string(),
                },
            )
        };

        if !policy.archived_allowed(&request.archived_url, &request.caller_host) {
            return Err(rejected(Side::Archived));
        }
        if !policy.live_allowed(&request.live_url) {
            return Err(rejected(Side::Live));
        }
        Ok(())
    }

    /// Fetch both sides on separate tasks; neither can cancel the other
    async fn fetch_both(&self, request: &ComparisonRequest) -> (FetchOutcome, FetchOutcome) {
        let task_a = self.spawn_fetch(request.archived_url.clone());
        let task_b = self.spawn_fetch(request.live_url.clone());
        let (joined_a, joined_b) = tokio::join!(task_a, task_b);

        let settle = |joined: Result<FetchOutcome, tokio::task::JoinError>, url: &str| {
            joined.unwrap_or_else(|e| {
                error!("Fetch task for {url} failed: {e}");
                FetchOutcome::failure(
                    FetchErrorKind::Unexpected,
                    format!("Error: Fetch failed for {url}. See server logs."),
                )
            })
        };

        let outcome_a = settle(joined_a, &request.archived_url);
        let outcome_b = settle(joined_b, &request.live_url);
        info!(
            archived_ok = outcome_a.is_success(),
            live_ok = outcome_b.is_success(),
            "Parallel fetch finished"
        );
        (outcome_a, outcome_b)
    }

    fn spawn_fetch(&self, url: String) -> tokio::task::JoinHandle<FetchOutcome> {
        let fetcher = Arc::clone(&self.fetcher);
        tokio::spawn(async move { fetcher.fetch(&url).await })
    }
}

/// Extract, diff and format both sides
///
/// Runs on the blocking pool: large documents make this CPU-bound.
fn process(config: &CompareConfig, text_a: &str, text_b: &str) -> CompareResult<Processed> {
    debug!(stage = %Stage::Extracting);
    let lines_a = extract(text_a, config.extraction_mode(), config.noise_markers());
    let lines_b = extract(text_b, config.extraction_mode(), config.noise_markers());

    debug!(stage = %Stage::Diffing);
    let opcodes = diff(&lines_a, &lines_b);
    info!("Generated {} opcodes", opcodes.len());

    debug!(stage = %Stage::Formatting);
    let output = formatter_for(config.output_mode())
        .format(&lines_a, &lines_b, &opcodes)
        .map_err(|e| {
            error!("Formatter rejected opcodes: {e}");
            CompareError::DiffProcessing
        })?;

    Ok(Processed {
        lines_a,
        lines_b,
        output,
    })
}
