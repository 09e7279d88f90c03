//! Test utilities and helper functions for the pagediff test suite

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use kodegen_tools_pagediff::config::{CompareConfig, StrategyPolicy};
use kodegen_tools_pagediff::{Fetch, FetchErrorKind, FetchOutcome};
use mockito::{Mock, Server};

/// Creates a test HTML document with specified content
#[allow(dead_code)]
pub fn create_test_html(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{}</title>
    <script>var CDC_POST="tracking";</script>
</head>
<body>
    {}
</body>
</html>"#,
        html_escape::encode_text(title),
        body
    )
}

/// Creates a mock endpoint that returns HTML content
#[allow(dead_code)]
pub fn create_html_mock(server: &mut Server, path: &str, html: &str) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(html)
        .create()
}

/// Creates a mock endpoint that returns an error
#[allow(dead_code)]
pub fn create_error_mock(server: &mut Server, path: &str, status: usize) -> Mock {
    server
        .mock("GET", path)
        .with_status(status)
        .with_body("Error")
        .create()
}

/// Helper to create test URLs
#[allow(dead_code)]
pub fn test_url(server: &Server, path: &str) -> String {
    format!("{}{}", server.url(), path)
}

/// `host:port` of the mock server, used as the caller host
#[allow(dead_code)]
pub fn caller_host(server: &Server) -> String {
    server.host_with_port()
}

/// Static-only configuration where both sides may live on the mock server
#[allow(dead_code)]
pub fn local_config() -> kodegen_tools_pagediff::config::CompareConfigBuilder<
    kodegen_tools_pagediff::config::WithLiveDomain,
> {
    CompareConfig::builder()
        .live_domain("127.0.0.1")
        .live_schemes(vec!["http".to_string()])
        .strategy(StrategyPolicy::StaticOnly)
        .static_timeout(Duration::from_secs(5))
}

/// Fetcher answering from a fixed table, optionally after a delay
#[allow(dead_code)]
pub struct ScriptedFetcher {
    outcomes: HashMap<String, (Duration, FetchOutcome)>,
}

#[allow(dead_code)]
impl ScriptedFetcher {
    pub fn new() -> Self {
        Self {
            outcomes: HashMap::new(),
        }
    }

    pub fn respond(mut self, url: &str, outcome: FetchOutcome) -> Self {
        self.outcomes
            .insert(url.to_string(), (Duration::ZERO, outcome));
        self
    }

    pub fn respond_after(mut self, url: &str, delay: Duration, outcome: FetchOutcome) -> Self {
        self.outcomes.insert(url.to_string(), (delay, outcome));
        self
    }
}

impl Fetch for ScriptedFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> Pin<Box<dyn Future<Output = FetchOutcome> + Send + 'a>> {
        Box::pin(async move {
            match self.outcomes.get(url) {
                Some((delay, outcome)) => {
                    if !delay.is_zero() {
                        tokio::time::sleep(*delay).await;
                    }
                    outcome.clone()
                }
                None => panic!("unscripted fetch: {url}"),
            }
        })
    }
}

/// A fetcher whose every call panics, to exercise task-failure handling
#[allow(dead_code)]
pub struct PanickingFetcher;

impl Fetch for PanickingFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> Pin<Box<dyn Future<Output = FetchOutcome> + Send + 'a>> {
        Box::pin(async move {
            if url.contains("explode") {
                panic!("fetch exploded for {url}");
            }
            FetchOutcome::classified(FetchErrorKind::Unexpected, url)
        })
    }
}
