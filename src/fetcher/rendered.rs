//! Headless-browser retrieval for script-dependent pages
//!
//! Fixed step order inside one fetch:
//! 1. launch an isolated session and attach listeners
//! 2. navigate, bounded by the navigation timeout (fatal)
//! 3. check the main document status
//! 4. wait for network idle (best effort, never fatal)
//! 5. read the rendered HTML and enforce the size ceiling
//! 6. convert to text
//!
//! The session is closed on every path out of step 2 onwards; if this future
//! is dropped mid-flight the session's `Drop` takes over.

use std::time::Duration;

use chromiumoxide::Page;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::interception::{RequestFilter, spawn_interceptor};
use super::network_idle::NetworkIdleTracker;
use super::outcome::{FetchErrorKind, FetchOutcome};
use super::page_events::{
    DocumentStatus, ListenerTasks, await_document_status, track_network_activity,
    watch_document_status,
};
use super::page_timeout::{PageOpError, with_page_timeout};
use super::session::{CleanupResult, RenderSession};
use crate::config::{FetchConfig, TextConversion};
use crate::text_extractor::html_to_text;
use crate::url_validator::NavigationScope;

/// How long to wait for the response listener after `load` fired
const STATUS_GRACE: Duration = Duration::from_secs(1);

const CONTENT_READ_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn fetch_rendered(
    config: &FetchConfig,
    scope: &NavigationScope,
    url: &str,
) -> FetchOutcome {
    info!("Rendered fetch: {url}");

    let session = match RenderSession::launch(config).await {
        Ok(session) => session,
        Err(e) => {
            warn!("Browser launch failed for {url}: {e:#}");
            return FetchOutcome::failure(
                FetchErrorKind::Unexpected,
                format!("Error: Browser automation setup error for {url}"),
            );
        }
    };

    let outcome = render_page(&session, config, scope, url).await;

    match session.close().await {
        CleanupResult::Success => debug!("Browser session closed for {url}"),
        CleanupResult::PartialFailure(errors) => {
            warn!("Browser session cleanup incomplete for {url}: {errors:?}");
        }
    }

    outcome
}

async fn render_page(
    session: &RenderSession,
    config: &FetchConfig,
    scope: &NavigationScope,
    url: &str,
) -> FetchOutcome {
    let page = match session.new_page().await {
        Ok(page) => page,
        Err(e) => {
            warn!("Page creation failed for {url}: {e:#}");
            return FetchOutcome::classified(FetchErrorKind::Unexpected, url);
        }
    };

    let tracker = NetworkIdleTracker::new();
    let mut listeners = ListenerTasks::default();
    let filter = RequestFilter::from_config(config).confine_documents(scope.clone(), url);
    let mut status_rx = match attach_listeners(&page, filter, &tracker, &mut listeners).await {
        Ok(rx) => rx,
        Err(e) => {
            warn!("Failed to attach page listeners for {url}: {e:#}");
            return FetchOutcome::classified(FetchErrorKind::Unexpected, url);
        }
    };

    let navigation_timeout = config.navigation_timeout();
    if let Err(e) = with_page_timeout(page.goto(url), navigation_timeout, "Page navigation").await {
        return classify_navigation_error(&e, url, navigation_timeout);
    }

    match await_document_status(&mut status_rx, STATUS_GRACE).await {
        Some(status) if status.is_acceptable() => {
            info!("Got status {} for {url}", status.status);
        }
        Some(status) => {
            return FetchOutcome::http_status(url, status.status, Some(&status.status_text));
        }
        None => {
            warn!("No main document response observed for {url}");
            return FetchOutcome::failure(
                FetchErrorKind::Unexpected,
                format!("Error: Browser failed to get response for {url}"),
            );
        }
    }

    let idle = tracker
        .wait_for_idle(config.network_idle_quiet_period(), config.network_idle_timeout())
        .await;
    if idle {
        debug!("Network appears idle for {url}");
    } else {
        warn!("Network idle timeout hit for {url}. Proceeding.");
    }

    let html = match with_page_timeout(page.content(), CONTENT_READ_TIMEOUT, "Content read").await
    {
        Ok(html) => html,
        Err(e) => {
            warn!("Failed to read rendered HTML for {url}: {e}");
            return FetchOutcome::failure(
                FetchErrorKind::ContentExtraction,
                format!("Error: Failed to extract rendered HTML from {url}"),
            );
        }
    };
    drop(listeners);

    let limit = config.max_content_bytes();
    info!("HTML content size: {} bytes for {url}", html.len());
    if html.len() > limit {
        return FetchOutcome::size_limit(url, limit);
    }

    match config.conversion() {
        TextConversion::PlainText => FetchOutcome::success(html_to_text(&html)),
        TextConversion::Markup => FetchOutcome::success(html),
    }
}

async fn attach_listeners(
    page: &Page,
    filter: RequestFilter,
    tracker: &NetworkIdleTracker,
    listeners: &mut ListenerTasks,
) -> anyhow::Result<watch::Receiver<Option<DocumentStatus>>> {
    listeners.push(spawn_interceptor(page, filter).await?);
    listeners.push(track_network_activity(page, tracker.clone()).await?);
    let (task, rx) = watch_document_status(page).await?;
    listeners.push(task);
    Ok(rx)
}

fn classify_navigation_error(error: &PageOpError, url: &str, limit: Duration) -> FetchOutcome {
    if error.is_timeout() {
        warn!("Navigation timeout after {}ms for {url}", limit.as_millis());
        return FetchOutcome::timeout(url, limit);
    }

    let chain = error.chain_text();
    warn!("Navigation failed for {url}: {chain}");
    match FetchErrorKind::from_network_message(&chain) {
        FetchErrorKind::NavigationTimeout => FetchOutcome::timeout(url, limit),
        FetchErrorKind::Unexpected => FetchOutcome::failure(
            FetchErrorKind::Unexpected,
            format!("Error: Browser navigation error for {url}"),
        ),
        kind => FetchOutcome::classified(kind, url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_errors_map_to_kinds() {
        let limit = Duration::from_secs(20);
        let failed = |msg: &str| PageOpError::Failed {
            operation: "Page navigation",
            source: anyhow::anyhow!(msg.to_string()),
        };

        let out = classify_navigation_error(&failed("net::ERR_NAME_NOT_RESOLVED"), "u", limit);
        assert_eq!(out.kind(), Some(FetchErrorKind::DnsResolution));

        let out = classify_navigation_error(&failed("net::ERR_CONNECTION_REFUSED"), "u", limit);
        assert_eq!(out.kind(), Some(FetchErrorKind::ConnectionRefused));

        let out = classify_navigation_error(&failed("net::ERR_SSL_PROTOCOL_ERROR"), "u", limit);
        assert_eq!(
            out,
            FetchOutcome::failure(
                FetchErrorKind::Unexpected,
                "Error: Browser navigation error for u"
            )
        );

        let timed_out = PageOpError::TimedOut {
            operation: "Page navigation",
            after: limit,
        };
        assert_eq!(
            classify_navigation_error(&timed_out, "u", limit),
            FetchOutcome::timeout("u", limit)
        );
    }
}
