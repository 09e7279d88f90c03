//! Read-only accessors for `CompareConfig` and `FetchConfig`

use std::path::Path;
use std::time::Duration;

use super::types::{
    BlockedResourceType, CompareConfig, ExtractionMode, FetchConfig, OutputMode, StrategyPolicy,
    TextConversion,
};

impl CompareConfig {
    #[must_use]
    pub fn live_domain(&self) -> &str {
        &self.live_domain
    }

    #[must_use]
    pub fn live_schemes(&self) -> &[String] {
        &self.live_schemes
    }

    #[must_use]
    pub fn archive_schemes(&self) -> &[String] {
        &self.archive_schemes
    }

    #[must_use]
    pub fn allow_live_subdomains(&self) -> bool {
        self.allow_live_subdomains
    }

    #[must_use]
    pub fn extraction_mode(&self) -> ExtractionMode {
        self.fetch.extraction_mode
    }

    #[must_use]
    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    #[must_use]
    pub fn noise_markers(&self) -> &[String] {
        &self.noise_markers
    }

    #[must_use]
    pub fn fetch(&self) -> &FetchConfig {
        &self.fetch
    }

    /// URL policy view used by the orchestrator's validation step
    #[must_use]
    pub fn url_policy(&self) -> crate::url_validator::UrlPolicy<'_> {
        crate::url_validator::UrlPolicy {
            archive_schemes: &self.archive_schemes,
            live_schemes: &self.live_schemes,
            live_domain: &self.live_domain,
            allow_live_subdomains: self.allow_live_subdomains,
        }
    }

    /// Scope the fetcher re-checks on redirects and document navigations
    #[must_use]
    pub fn navigation_scope(&self) -> crate::url_validator::NavigationScope {
        crate::url_validator::NavigationScope::new(&self.url_policy())
    }
}

impl FetchConfig {
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn static_timeout(&self) -> Duration {
        Duration::from_millis(self.static_timeout_ms)
    }

    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    #[must_use]
    pub fn network_idle_timeout(&self) -> Duration {
        Duration::from_millis(self.network_idle_timeout_ms)
    }

    #[must_use]
    pub fn network_idle_quiet_period(&self) -> Duration {
        Duration::from_millis(self.network_idle_quiet_ms)
    }

    #[must_use]
    pub fn max_content_bytes(&self) -> usize {
        self.max_content_bytes
    }

    #[must_use]
    pub fn blocked_resource_types(&self) -> &[BlockedResourceType] {
        &self.blocked_resource_types
    }

    #[must_use]
    pub fn blocked_url_substrings(&self) -> &[String] {
        &self.blocked_url_substrings
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn strategy(&self) -> &StrategyPolicy {
        &self.strategy
    }

    #[must_use]
    pub fn extraction_mode(&self) -> ExtractionMode {
        self.extraction_mode
    }

    /// Raw markup for hierarchical extraction, plain text otherwise
    #[must_use]
    pub fn conversion(&self) -> TextConversion {
        self.extraction_mode.into()
    }

    #[must_use]
    pub fn max_rendering_sessions(&self) -> usize {
        self.max_rendering_sessions
    }

    #[must_use]
    pub fn chrome_executable(&self) -> Option<&Path> {
        self.chrome_executable.as_deref()
    }
}
