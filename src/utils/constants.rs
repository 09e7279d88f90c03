//! Shared configuration constants for pagediff
//!
//! This module contains default values and configuration constants used
//! throughout the codebase to ensure consistency and avoid magic numbers.

/// Official domain the live side of a comparison must belong to
///
/// Subdomains are accepted as well (`www.cdc.gov`, `archive.cdc.gov`) when
/// `allow_live_subdomains` is enabled, which is the default.
pub const DEFAULT_LIVE_DOMAIN: &str = "cdc.gov";

/// User agent sent by both retrieval strategies
///
/// Chrome-compatible so script-heavy pages serve their normal markup, with a
/// trailing tool token so site operators can identify the traffic.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36 PageDiff/2.0";

/// Static retrieval timeout: 10 seconds for the whole GET including body
pub const DEFAULT_STATIC_TIMEOUT_MS: u64 = 10_000;

/// Rendered retrieval navigation timeout: 20 seconds
///
/// Covers `page.goto()` up to the main `load` event. Expiry is fatal for
/// that side of the comparison.
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 20_000;

/// Best-effort wait for network quiescence after `load`: 3 seconds
///
/// Expiry is NOT fatal. Whatever has rendered by then is extracted.
pub const DEFAULT_NETWORK_IDLE_TIMEOUT_MS: u64 = 3_000;

/// How long the network must stay silent to count as idle: 500ms
///
/// Matches the quiet window headless automation tools use for `networkidle`.
pub const DEFAULT_NETWORK_IDLE_QUIET_MS: u64 = 500;

/// Ceiling on fetched document size: 10 MB
///
/// Applied to the rendered HTML (and to the static response body) before any
/// text conversion happens.
pub const DEFAULT_MAX_CONTENT_BYTES: usize = 10 * 1024 * 1024;

/// Server-wide cap on concurrently running headless browser sessions
///
/// Each comparison needs at most two; four lets two comparisons render in
/// parallel before further callers queue.
pub const DEFAULT_MAX_RENDERING_SESSIONS: usize = 4;

/// Hard cap on block nesting followed by the hierarchical extractor
///
/// Deeper block elements are folded into their parent's inline text instead of
/// opening a new level.
pub const MAX_EXTRACTION_DEPTH: usize = 200;

/// Sub-resource URL fragments that identify analytics, ad and tracker traffic
pub const DEFAULT_BLOCKED_URL_SUBSTRINGS: &[&str] = &[
    "google-analytics.com",
    "googletagmanager.com",
    "doubleclick.net",
    "ads.",
    "adservice.",
    "adsystem.",
    "/ads?",
    "/adserver?",
    "/track?",
];

/// Tokens injected into pages by instrumentation, A/B bucketing and the
/// archive's own replay proxy. Any text unit containing one is dropped.
pub const DEFAULT_NOISE_MARKERS: &[&str] = &[
    "CDC_POST=",
    "CDC_PRE=",
    "WB$wombat",
    "CDC.ABTest",
    "CDC_AAref_Val",
];

/// Message used when processing fails after both sides were fetched
pub const PROCESSING_ERROR_MESSAGE: &str = "Error: Internal error during comparison processing.";
