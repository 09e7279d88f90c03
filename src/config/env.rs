//! Environment overlay for `CompareConfig`
//!
//! Every variable is optional; unset variables keep the builder defaults.
//! Malformed values are an error rather than being silently ignored.

use anyhow::{Context, Result, anyhow};
use std::path::PathBuf;
use std::time::Duration;

use super::builder::{CompareConfigBuilder, WithLiveDomain};
use super::types::{CompareConfig, StrategyPolicy};
use crate::utils::DEFAULT_LIVE_DOMAIN;

pub const ENV_LIVE_DOMAIN: &str = "PAGEDIFF_LIVE_DOMAIN";
pub const ENV_NAV_TIMEOUT_MS: &str = "PAGEDIFF_NAV_TIMEOUT_MS";
pub const ENV_IDLE_TIMEOUT_MS: &str = "PAGEDIFF_IDLE_TIMEOUT_MS";
pub const ENV_STATIC_TIMEOUT_MS: &str = "PAGEDIFF_STATIC_TIMEOUT_MS";
pub const ENV_HEADLESS: &str = "PAGEDIFF_HEADLESS";
pub const ENV_MAX_CONTENT_BYTES: &str = "PAGEDIFF_MAX_CONTENT_BYTES";
pub const ENV_RENDER: &str = "PAGEDIFF_RENDER";
pub const ENV_CHROMIUM_PATH: &str = "CHROMIUM_PATH";

impl CompareConfig {
    /// Builder seeded from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error when a variable is set but cannot be parsed.
    pub fn builder_from_env() -> Result<CompareConfigBuilder<WithLiveDomain>> {
        overlay(|key| std::env::var(key).ok())
    }

    /// Fully built configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error for unparseable variables or an invalid resulting config.
    pub fn from_env() -> Result<Self> {
        Self::builder_from_env()?.build()
    }
}

/// Apply variables from `lookup` on top of the defaults
pub(crate) fn overlay(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<CompareConfigBuilder<WithLiveDomain>> {
    let domain = lookup(ENV_LIVE_DOMAIN).unwrap_or_else(|| DEFAULT_LIVE_DOMAIN.to_string());
    let mut builder = CompareConfig::builder().live_domain(domain);

    if let Some(ms) = parse_u64(&lookup, ENV_NAV_TIMEOUT_MS)? {
        builder = builder.navigation_timeout(Duration::from_millis(ms));
    }
    if let Some(ms) = parse_u64(&lookup, ENV_IDLE_TIMEOUT_MS)? {
        builder = builder.network_idle_timeout(Duration::from_millis(ms));
    }
    if let Some(ms) = parse_u64(&lookup, ENV_STATIC_TIMEOUT_MS)? {
        builder = builder.static_timeout(Duration::from_millis(ms));
    }
    if let Some(bytes) = parse_u64(&lookup, ENV_MAX_CONTENT_BYTES)? {
        let bytes = usize::try_from(bytes)
            .with_context(|| format!("{ENV_MAX_CONTENT_BYTES} out of range"))?;
        builder = builder.max_content_bytes(bytes);
    }
    if let Some(raw) = lookup(ENV_HEADLESS) {
        builder = builder.headless(parse_bool(&raw).ok_or_else(|| {
            anyhow!("{ENV_HEADLESS} must be true/false, got '{raw}'")
        })?);
    }
    if let Some(raw) = lookup(ENV_RENDER) {
        builder = builder.strategy(parse_strategy(&raw));
    }
    if let Some(path) = lookup(ENV_CHROMIUM_PATH).filter(|p| !p.trim().is_empty()) {
        builder = builder.chrome_executable(Some(PathBuf::from(path)));
    }

    Ok(builder)
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<u64>> {
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .with_context(|| format!("{key} must be a non-negative integer, got '{raw}'"))
        })
        .transpose()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// `always`, `never`, or a comma-separated host list
fn parse_strategy(raw: &str) -> StrategyPolicy {
    match raw.trim().to_ascii_lowercase().as_str() {
        "always" | "" => StrategyPolicy::AlwaysRendered,
        "never" => StrategyPolicy::StaticOnly,
        hosts => StrategyPolicy::RenderedFor(
            hosts
                .split(',')
                .map(str::trim)
                .filter(|h| !h.is_empty())
                .map(ToString::to_string)
                .collect(),
        ),
    }
}
