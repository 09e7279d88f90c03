//! Type-safe builder for `CompareConfig` using the typestate pattern
//!
//! The live domain is the one setting without a safe default for arbitrary
//! deployments, so `build()` only exists once it has been provided.

use anyhow::{Result, anyhow};
use std::marker::PhantomData;
use std::path::PathBuf;
use std::time::Duration;

use super::types::{
    BlockedResourceType, CompareConfig, ExtractionMode, OutputMode, StrategyPolicy,
};

// Type states for the builder
pub struct WithLiveDomain;

pub struct CompareConfigBuilder<State = ()> {
    pub(crate) config: CompareConfig,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for CompareConfigBuilder<()> {
    fn default() -> Self {
        Self {
            config: CompareConfig::default(),
            _phantom: PhantomData,
        }
    }
}

impl CompareConfig {
    /// Create a builder for configuring a `CompareConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> CompareConfigBuilder<()> {
        CompareConfigBuilder::default()
    }
}

/// Normalize a domain entry: lowercase, no scheme, no path, no port
fn normalize_domain(domain: &str) -> String {
    let domain = domain.trim();
    let domain = domain
        .split_once("://")
        .map_or(domain, |(_, rest)| rest);
    let domain = domain.split('/').next().unwrap_or(domain);
    crate::utils::host_without_port(domain)
        .trim_matches('.')
        .to_ascii_lowercase()
}

impl<State> CompareConfigBuilder<State> {
    /// Set (or replace) the live domain; unlocks `build()`
    pub fn live_domain(self, domain: impl Into<String>) -> CompareConfigBuilder<WithLiveDomain> {
        let mut config = self.config;
        config.live_domain = normalize_domain(&domain.into());
        CompareConfigBuilder {
            config,
            _phantom: PhantomData,
        }
    }

    #[must_use]
    pub fn live_schemes(mut self, schemes: Vec<String>) -> Self {
        self.config.live_schemes = schemes;
        self
    }

    #[must_use]
    pub fn archive_schemes(mut self, schemes: Vec<String>) -> Self {
        self.config.archive_schemes = schemes;
        self
    }

    #[must_use]
    pub fn allow_live_subdomains(mut self, allow: bool) -> Self {
        self.config.allow_live_subdomains = allow;
        self
    }

    /// Also selects the fetcher's text conversion to match
    #[must_use]
    pub fn extraction_mode(mut self, mode: ExtractionMode) -> Self {
        self.config.fetch.extraction_mode = mode;
        self
    }

    #[must_use]
    pub fn output_mode(mut self, mode: OutputMode) -> Self {
        self.config.output_mode = mode;
        self
    }

    #[must_use]
    pub fn noise_markers(mut self, markers: Vec<String>) -> Self {
        self.config.noise_markers = markers;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.fetch.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn static_timeout(mut self, timeout: Duration) -> Self {
        self.config.fetch.static_timeout_ms = duration_ms(timeout);
        self
    }

    #[must_use]
    pub fn navigation_timeout(mut self, timeout: Duration) -> Self {
        self.config.fetch.navigation_timeout_ms = duration_ms(timeout);
        self
    }

    #[must_use]
    pub fn network_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.fetch.network_idle_timeout_ms = duration_ms(timeout);
        self
    }

    #[must_use]
    pub fn network_idle_quiet_period(mut self, quiet: Duration) -> Self {
        self.config.fetch.network_idle_quiet_ms = duration_ms(quiet);
        self
    }

    #[must_use]
    pub fn max_content_bytes(mut self, bytes: usize) -> Self {
        self.config.fetch.max_content_bytes = bytes;
        self
    }

    #[must_use]
    pub fn blocked_resource_types(mut self, types: Vec<BlockedResourceType>) -> Self {
        self.config.fetch.blocked_resource_types = types;
        self
    }

    #[must_use]
    pub fn blocked_url_substrings(mut self, substrings: Vec<String>) -> Self {
        self.config.fetch.blocked_url_substrings = substrings;
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.fetch.headless = headless;
        self
    }

    #[must_use]
    pub fn strategy(mut self, strategy: StrategyPolicy) -> Self {
        self.config.fetch.strategy = strategy;
        self
    }

    #[must_use]
    pub fn max_rendering_sessions(mut self, sessions: usize) -> Self {
        self.config.fetch.max_rendering_sessions = sessions;
        self
    }

    #[must_use]
    pub fn chrome_executable(mut self, path: Option<PathBuf>) -> Self {
        self.config.fetch.chrome_executable = path;
        self
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl CompareConfigBuilder<WithLiveDomain> {
    /// Validate and freeze the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the live domain is empty, a scheme list is empty,
    /// a timeout or the size ceiling is zero, or no rendering session is allowed.
    pub fn build(self) -> Result<CompareConfig> {
        let mut config = self.config;

        if config.live_domain.is_empty() {
            return Err(anyhow!("Live domain must not be empty"));
        }

        config.live_schemes = normalize_schemes(config.live_schemes);
        config.archive_schemes = normalize_schemes(config.archive_schemes);
        if config.live_schemes.is_empty() {
            return Err(anyhow!("At least one live URL scheme must be allowed"));
        }
        if config.archive_schemes.is_empty() {
            return Err(anyhow!("At least one archive URL scheme must be allowed"));
        }

        let fetch = &mut config.fetch;
        for (name, value) in [
            ("static_timeout", fetch.static_timeout_ms),
            ("navigation_timeout", fetch.navigation_timeout_ms),
            ("network_idle_timeout", fetch.network_idle_timeout_ms),
        ] {
            if value == 0 {
                return Err(anyhow!("{name} must be greater than zero"));
            }
        }
        if fetch.max_content_bytes == 0 {
            return Err(anyhow!("max_content_bytes must be greater than zero"));
        }
        if fetch.max_rendering_sessions == 0 {
            return Err(anyhow!("max_rendering_sessions must be at least 1"));
        }
        if fetch.user_agent.trim().is_empty() {
            return Err(anyhow!("user_agent must not be empty"));
        }

        if let StrategyPolicy::RenderedFor(hosts) = &mut fetch.strategy {
            *hosts = hosts
                .iter()
                .map(|h| normalize_domain(h))
                .filter(|h| !h.is_empty())
                .collect();
        }

        fetch.blocked_url_substrings.retain(|s| !s.is_empty());
        config.noise_markers.retain(|m| !m.is_empty());

        Ok(config)
    }
}

fn normalize_schemes(schemes: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = schemes
        .into_iter()
        .map(|s| s.trim().trim_end_matches("://").to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    out.dedup();
    out
}
