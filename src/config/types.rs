//! Core configuration types for page comparison
//!
//! This module contains the main `CompareConfig` struct and the fetch-level
//! `FetchConfig` it carries. Both are immutable once built and shared
//! read-only across every comparison.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::{
    DEFAULT_BLOCKED_URL_SUBSTRINGS, DEFAULT_LIVE_DOMAIN, DEFAULT_MAX_CONTENT_BYTES,
    DEFAULT_MAX_RENDERING_SESSIONS, DEFAULT_NAVIGATION_TIMEOUT_MS, DEFAULT_NETWORK_IDLE_QUIET_MS,
    DEFAULT_NETWORK_IDLE_TIMEOUT_MS, DEFAULT_NOISE_MARKERS, DEFAULT_STATIC_TIMEOUT_MS,
    DEFAULT_USER_AGENT,
};

/// How fetched content is turned into comparable text units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    /// One depth-0 unit per line of plain text
    #[default]
    Flat,
    /// `(depth, text)` units following the document's block structure
    Hierarchical,
}

/// Which result shape the formatter produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Index-referencing render instructions for a client-side renderer
    #[default]
    Instructions,
    /// Styled HTML fragment
    HtmlFragment,
}

/// What the fetcher hands back on success
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextConversion {
    /// Document converted to indented plain text, one block per line
    #[default]
    PlainText,
    /// Document markup returned untouched for hierarchical extraction
    Markup,
}

impl From<ExtractionMode> for TextConversion {
    fn from(mode: ExtractionMode) -> Self {
        match mode {
            ExtractionMode::Flat => Self::PlainText,
            ExtractionMode::Hierarchical => Self::Markup,
        }
    }
}

/// Sub-resource categories the rendered fetch may refuse to load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockedResourceType {
    Image,
    Font,
    Media,
    Stylesheet,
    Script,
    Xhr,
    Fetch,
    WebSocket,
    Other,
}

/// Selects static or rendered retrieval per target URL
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyPolicy {
    /// Headless browser for every URL
    #[default]
    AlwaysRendered,
    /// Plain HTTP GET for every URL
    StaticOnly,
    /// Headless browser for these hosts (and their subdomains), static otherwise
    RenderedFor(Vec<String>),
}

/// Fetch-level settings, handed to the `Fetcher` at construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    pub(crate) user_agent: String,
    pub(crate) static_timeout_ms: u64,

    /// Timeout for `page.goto()` up to the `load` event. Fatal on expiry.
    pub(crate) navigation_timeout_ms: u64,

    /// Upper bound on the post-load network idle wait. Never fatal.
    pub(crate) network_idle_timeout_ms: u64,
    pub(crate) network_idle_quiet_ms: u64,

    /// Ceiling on document bytes before text conversion
    pub(crate) max_content_bytes: usize,
    pub(crate) blocked_resource_types: Vec<BlockedResourceType>,
    pub(crate) blocked_url_substrings: Vec<String>,
    pub(crate) headless: bool,
    pub(crate) strategy: StrategyPolicy,

    /// Also decides what the fetcher hands back, see [`FetchConfig::conversion`]
    pub(crate) extraction_mode: ExtractionMode,

    /// Server-wide cap on concurrently open browser sessions
    pub(crate) max_rendering_sessions: usize,

    /// Explicit Chrome/Chromium binary; discovered when unset
    pub(crate) chrome_executable: Option<PathBuf>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            static_timeout_ms: DEFAULT_STATIC_TIMEOUT_MS,
            navigation_timeout_ms: DEFAULT_NAVIGATION_TIMEOUT_MS,
            network_idle_timeout_ms: DEFAULT_NETWORK_IDLE_TIMEOUT_MS,
            network_idle_quiet_ms: DEFAULT_NETWORK_IDLE_QUIET_MS,
            max_content_bytes: DEFAULT_MAX_CONTENT_BYTES,
            blocked_resource_types: vec![
                BlockedResourceType::Image,
                BlockedResourceType::Font,
                BlockedResourceType::Media,
                BlockedResourceType::Stylesheet,
            ],
            blocked_url_substrings: DEFAULT_BLOCKED_URL_SUBSTRINGS
                .iter()
                .map(ToString::to_string)
                .collect(),
            headless: true,
            strategy: StrategyPolicy::default(),
            extraction_mode: ExtractionMode::default(),
            max_rendering_sessions: DEFAULT_MAX_RENDERING_SESSIONS,
            chrome_executable: None,
        }
    }
}

/// Main configuration struct for comparisons
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareConfig {
    /// Official domain for the live side.
    ///
    /// **INVARIANT:** lowercase, non-empty, no scheme or port (normalized in builder).
    pub(crate) live_domain: String,
    pub(crate) live_schemes: Vec<String>,
    pub(crate) archive_schemes: Vec<String>,
    pub(crate) allow_live_subdomains: bool,
    pub(crate) output_mode: OutputMode,
    pub(crate) noise_markers: Vec<String>,
    pub(crate) fetch: FetchConfig,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            live_domain: DEFAULT_LIVE_DOMAIN.to_string(),
            live_schemes: vec!["https".to_string()],
            archive_schemes: vec!["http".to_string(), "https".to_string()],
            allow_live_subdomains: true,
            output_mode: OutputMode::default(),
            noise_markers: DEFAULT_NOISE_MARKERS.iter().map(ToString::to_string).collect(),
            fetch: FetchConfig::default(),
        }
    }
}
