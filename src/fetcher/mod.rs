//! Page retrieval
//!
//! [`Fetcher`] picks static or rendered retrieval per URL from the
//! configured [`StrategyPolicy`] and always answers with a [`FetchOutcome`].
//! Rendered sessions are bounded process-wide by a semaphore so concurrent
//! comparisons queue instead of spawning unbounded browsers.

pub mod interception;
pub mod network_idle;
pub mod outcome;
pub mod page_events;
pub mod page_timeout;
pub mod rendered;
pub mod session;
pub mod static_fetch;

pub use outcome::{FetchErrorKind, FetchOutcome};
pub use session::{CleanupResult, RenderSession};

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::config::{CompareConfig, FetchConfig, StrategyPolicy};
use crate::url_validator::{NavigationScope, host_allowed};
use crate::utils::url_host;

/// Anything that can turn a URL into a [`FetchOutcome`]
///
/// The orchestrator only depends on this seam, so tests can script outcomes
/// without touching the network.
pub trait Fetch: Send + Sync + 'static {
    fn fetch<'a>(&'a self, url: &'a str) -> Pin<Box<dyn Future<Output = FetchOutcome> + Send + 'a>>;
}

/// Retrieval strategy chosen for one URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Static,
    Rendered,
}

impl StrategyPolicy {
    /// Strategy for `url`; unparseable URLs fall back to static retrieval
    #[must_use]
    pub fn strategy_for(&self, url: &str) -> Strategy {
        match self {
            Self::AlwaysRendered => Strategy::Rendered,
            Self::StaticOnly => Strategy::Static,
            Self::RenderedFor(hosts) => match url_host(url) {
                Some(host) if host_allowed(&host, hosts.as_slice(), true) => Strategy::Rendered,
                _ => Strategy::Static,
            },
        }
    }
}

/// Production fetcher: static HTTP client plus bounded headless sessions
#[derive(Clone)]
pub struct Fetcher {
    config: Arc<FetchConfig>,
    scope: Arc<NavigationScope>,
    client: reqwest::Client,
    render_slots: Arc<Semaphore>,
}

impl Fetcher {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &CompareConfig) -> anyhow::Result<Self> {
        let scope = config.navigation_scope();
        let fetch = config.fetch().clone();
        let client = static_fetch::build_client(&fetch, scope.clone())?;
        let render_slots = Arc::new(Semaphore::new(fetch.max_rendering_sessions().max(1)));
        Ok(Self {
            config: Arc::new(fetch),
            scope: Arc::new(scope),
            client,
            render_slots,
        })
    }

    #[must_use]
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Rendering slots currently free
    #[must_use]
    pub fn available_render_slots(&self) -> usize {
        self.render_slots.available_permits()
    }

    pub async fn fetch_url(&self, url: &str) -> FetchOutcome {
        match self.config.strategy().strategy_for(url) {
            Strategy::Static => {
                static_fetch::fetch_static(&self.client, &self.config, url).await
            }
            Strategy::Rendered => {
                let Ok(_permit) = self.render_slots.acquire().await else {
                    warn!("Render slot semaphore closed; cannot fetch {url}");
                    return FetchOutcome::classified(FetchErrorKind::Unexpected, url);
                };
                debug!(
                    "Acquired render slot for {url} ({} left)",
                    self.render_slots.available_permits()
                );
                rendered::fetch_rendered(&self.config, &self.scope, url).await
            }
        }
    }
}

impl Fetch for Fetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> Pin<Box<dyn Future<Output = FetchOutcome> + Send + 'a>> {
        Box::pin(self.fetch_url(url))
    }
}
