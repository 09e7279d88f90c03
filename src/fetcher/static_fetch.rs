//! Plain HTTP retrieval
//!
//! One GET with the configured user agent and timeout. The body is streamed
//! so an oversized response is abandoned as soon as it crosses the ceiling.
//! Redirects are only followed while they stay inside the [`NavigationScope`];
//! a redirect leaving it is not followed and surfaces as an HTTP error.

use std::error::Error as StdError;

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use tracing::{debug, info, warn};

use super::outcome::{FetchErrorKind, FetchOutcome};
use crate::config::{FetchConfig, TextConversion};
use crate::text_extractor::html_to_text;
use crate::url_validator::NavigationScope;

const MAX_REDIRECTS: usize = 10;

/// Build the shared HTTP client for static retrieval
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialised.
pub fn build_client(config: &FetchConfig, scope: NavigationScope) -> anyhow::Result<Client> {
    Client::builder()
        .user_agent(config.user_agent())
        .timeout(config.static_timeout())
        .redirect(scoped_redirects(scope))
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))
}

/// Follow a redirect only if the request that started the chain may go there
fn scoped_redirects(scope: NavigationScope) -> Policy {
    Policy::custom(move |attempt| {
        if attempt.previous().len() > MAX_REDIRECTS {
            return attempt.error("too many redirects");
        }
        let allowed = attempt
            .previous()
            .first()
            .is_some_and(|origin| scope.allows(origin.as_str(), attempt.url().as_str()));
        if allowed {
            debug!("Following redirect to {}", attempt.url());
            attempt.follow()
        } else {
            warn!("Redirect to {} leaves the allowed scope, not following", attempt.url());
            attempt.stop()
        }
    })
}

pub async fn fetch_static(client: &Client, config: &FetchConfig, url: &str) -> FetchOutcome {
    info!("Static fetch: {url}");

    let mut response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_request_error(&e, config, url),
    };

    let status = response.status();
    if !status.is_success() {
        warn!("Static fetch got status {status} for {url}");
        return FetchOutcome::http_status(url, status.as_u16(), status.canonical_reason());
    }

    let limit = config.max_content_bytes();
    if response
        .content_length()
        .is_some_and(|len| len > limit as u64)
    {
        return FetchOutcome::size_limit(url, limit);
    }

    let is_html = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.to_ascii_lowercase().contains("html"));

    let mut body: Vec<u8> = Vec::new();
    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                if body.len() + chunk.len() > limit {
                    return FetchOutcome::size_limit(url, limit);
                }
                body.extend_from_slice(&chunk);
            }
            Ok(None) => break,
            Err(e) => return classify_request_error(&e, config, url),
        }
    }
    debug!("Static fetch read {} bytes from {url}", body.len());

    let text = String::from_utf8_lossy(&body);
    match config.conversion() {
        TextConversion::PlainText if is_html => FetchOutcome::success(html_to_text(&text)),
        _ => FetchOutcome::success(text.into_owned()),
    }
}

fn classify_request_error(error: &reqwest::Error, config: &FetchConfig, url: &str) -> FetchOutcome {
    warn!("Static fetch failed for {url}: {}", error_chain(error));

    if error.is_timeout() {
        return FetchOutcome::timeout(url, config.static_timeout());
    }
    match FetchErrorKind::from_network_message(&error_chain(error)) {
        FetchErrorKind::NavigationTimeout => FetchOutcome::timeout(url, config.static_timeout()),
        kind => FetchOutcome::classified(kind, url),
    }
}

/// reqwest's Display omits the underlying cause; walk the source chain
fn error_chain(error: &reqwest::Error) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
