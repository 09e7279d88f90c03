//! Sub-resource blocking for rendered retrieval
//!
//! The browser is launched with request interception enabled, so every
//! request pauses until the page answers it. Blocked requests fail with
//! `BlockedByClient`; everything else continues untouched. Documents are
//! never blocked by type or substring, only when a confined filter sees one
//! leave the [`NavigationScope`] of the page's first URL (a redirect or a
//! frame pointing elsewhere).

use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::fetch::{
    ContinueRequestParams, EventRequestPaused, FailRequestParams,
};
use chromiumoxide::cdp::browser_protocol::network::{ErrorReason, ResourceType};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::{BlockedResourceType, FetchConfig};
use crate::url_validator::NavigationScope;

/// Map a CDP resource type to a blockable category
///
/// `None` for documents, which are only ever checked against the scope.
#[must_use]
pub fn blockable_type(resource_type: &ResourceType) -> Option<BlockedResourceType> {
    match resource_type {
        ResourceType::Document => None,
        ResourceType::Image => Some(BlockedResourceType::Image),
        ResourceType::Font => Some(BlockedResourceType::Font),
        ResourceType::Media => Some(BlockedResourceType::Media),
        ResourceType::Stylesheet => Some(BlockedResourceType::Stylesheet),
        ResourceType::Script => Some(BlockedResourceType::Script),
        ResourceType::Xhr => Some(BlockedResourceType::Xhr),
        ResourceType::Fetch => Some(BlockedResourceType::Fetch),
        ResourceType::WebSocket => Some(BlockedResourceType::WebSocket),
        _ => Some(BlockedResourceType::Other),
    }
}

/// Decides which paused requests to fail
#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    blocked_types: Vec<BlockedResourceType>,
    blocked_substrings: Vec<String>,
    documents: Option<DocumentScope>,
}

#[derive(Debug, Clone)]
struct DocumentScope {
    scope: NavigationScope,
    origin: String,
}

impl RequestFilter {
    #[must_use]
    pub fn new(blocked_types: Vec<BlockedResourceType>, blocked_substrings: Vec<String>) -> Self {
        Self {
            blocked_types,
            blocked_substrings: blocked_substrings
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect(),
            documents: None,
        }
    }

    #[must_use]
    pub fn from_config(config: &FetchConfig) -> Self {
        Self::new(
            config.blocked_resource_types().to_vec(),
            config.blocked_url_substrings().to_vec(),
        )
    }

    /// Fail any document request that `scope` does not allow from `origin`
    ///
    /// `origin` itself always loads; the caller has already validated it.
    #[must_use]
    pub fn confine_documents(mut self, scope: NavigationScope, origin: impl Into<String>) -> Self {
        self.documents = Some(DocumentScope {
            scope,
            origin: origin.into(),
        });
        self
    }

    #[must_use]
    pub fn should_block(&self, resource_type: &ResourceType, url: &str) -> bool {
        let Some(category) = blockable_type(resource_type) else {
            return self
                .documents
                .as_ref()
                .is_some_and(|d| url != d.origin && !d.scope.allows(&d.origin, url));
        };
        self.blocked_types.contains(&category)
            || self.blocked_substrings.iter().any(|s| url.contains(s.as_str()))
    }
}

/// Answer paused requests for `page` until the page goes away
///
/// Must be spawned before navigation starts, otherwise the first request
/// stays paused forever.
///
/// # Errors
///
/// Returns an error if the event subscription cannot be created.
pub async fn spawn_interceptor(page: &Page, filter: RequestFilter) -> anyhow::Result<JoinHandle<()>> {
    let mut paused = page.event_listener::<EventRequestPaused>().await?;
    let page = page.clone();

    Ok(tokio::spawn(async move {
        while let Some(event) = paused.next().await {
            let url = event.request.url.as_str();
            if filter.should_block(&event.resource_type, url) {
                debug!("Blocking [{:?}]: {}", event.resource_type, url);
                let params =
                    FailRequestParams::new(event.request_id.clone(), ErrorReason::BlockedByClient);
                if let Err(e) = page.execute(params).await {
                    warn!("Ignoring error failing request {url}: {e}");
                }
            } else if let Err(e) = page
                .execute(ContinueRequestParams::new(event.request_id.clone()))
                .await
            {
                warn!("Ignoring error continuing request {url}: {e}");
            }
        }
    }))
}
