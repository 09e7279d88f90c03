pub mod browser_setup;
pub mod compare;
pub mod config;
pub mod diff_engine;
pub mod fetcher;
pub mod output;
pub mod text_extractor;
pub mod url_validator;
pub mod utils;

pub use browser_setup::{
    LaunchOptions, download_managed_browser, find_browser_executable, launch_browser,
};
pub use compare::{
    Comparator, CompareError, ComparisonRequest, ComparisonResult, Side, Stage,
};
pub use config::{CompareConfig, ExtractionMode, OutputMode, StrategyPolicy};
pub use diff_engine::{DiffOpcode, DiffTag, SequenceMatcher, diff};
pub use fetcher::{Fetch, FetchErrorKind, FetchOutcome, Fetcher};
pub use output::{DiffOutput, InstructionKind, RenderInstruction};
pub use text_extractor::{TextUnit, extract};
pub use url_validator::{NavigationScope, UrlPolicy, validate};

/// Compare one archived page against its live counterpart with a throwaway
/// [`Comparator`]
///
/// Long-running callers should build one `Comparator` and share it, so the
/// rendering-session bound applies across calls.
///
/// # Errors
///
/// Returns an error only if the HTTP client cannot be built. Comparison
/// failures are reported inside the returned [`ComparisonResult`].
pub async fn compare(
    config: CompareConfig,
    request: &ComparisonRequest,
) -> anyhow::Result<ComparisonResult> {
    let comparator = Comparator::new(config)?;
    Ok(comparator.compare(request).await)
}
