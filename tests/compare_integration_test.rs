//! End-to-end comparisons: static retrieval from a mock server, and scripted
//! fetchers for failure isolation

use std::time::{Duration, Instant};

use kodegen_tools_pagediff::config::{ExtractionMode, OutputMode};
use kodegen_tools_pagediff::{
    Comparator, ComparisonRequest, ComparisonResult, FetchErrorKind, FetchOutcome,
    InstructionKind,
};
use mockito::Server;

mod common;

use common::{PanickingFetcher, ScriptedFetcher};

#[tokio::test]
async fn static_comparison_reports_changed_line() {
    let mut server = Server::new_async().await;
    let _a = common::create_html_mock(
        &mut server,
        "/archive/page",
        &common::create_test_html("t", "<h1>Title</h1><p>Old guidance</p><p>Footer</p>"),
    );
    let _b = common::create_html_mock(
        &mut server,
        "/live/page",
        &common::create_test_html("t", "<h1>Title</h1><p>New guidance</p><p>Footer</p>"),
    );

    let comparator = Comparator::new(common::local_config().build().unwrap()).unwrap();
    let request = ComparisonRequest::new(
        common::test_url(&server, "/archive/page"),
        common::test_url(&server, "/live/page"),
        common::caller_host(&server),
    );
    let result = comparator.compare(&request).await;

    assert!(!result.is_error, "unexpected error: {result:?}");
    let texts_a: Vec<&str> = result.lines_a.iter().map(|u| u.text.as_str()).collect();
    assert_eq!(texts_a, vec!["Title", "Old guidance", "Footer"]);

    let kinds: Vec<InstructionKind> = result
        .output
        .instructions()
        .expect("instruction mode")
        .iter()
        .map(|i| i.kind())
        .collect();
    assert_eq!(
        kinds,
        vec![
            InstructionKind::Unchanged,
            InstructionKind::Replace,
            InstructionKind::Unchanged
        ]
    );
}

#[tokio::test]
async fn hierarchical_html_comparison_marks_insertions() {
    let mut server = Server::new_async().await;
    let _a = common::create_html_mock(
        &mut server,
        "/a",
        "<body><ul><li>one</li><li>two</li></ul></body>",
    );
    let _b = common::create_html_mock(
        &mut server,
        "/b",
        "<body><ul><li>one</li><li>two</li><li>three &amp; more</li></ul></body>",
    );

    let config = common::local_config()
        .extraction_mode(ExtractionMode::Hierarchical)
        .output_mode(OutputMode::HtmlFragment)
        .build()
        .unwrap();
    let comparator = Comparator::new(config).unwrap();
    let request = ComparisonRequest::new(
        common::test_url(&server, "/a"),
        common::test_url(&server, "/b"),
        common::caller_host(&server),
    );
    let result = comparator.compare(&request).await;

    assert!(!result.is_error, "unexpected error: {result:?}");
    let html = result.output.html_fragment().expect("html mode");
    assert!(html.contains("* three &amp; more"), "{html}");
    assert!(html.contains("background-color: #eaf2c2"));
    assert!(!html.contains("background-color: #fadad7"));
    assert!(result.html_table().is_some_and(|t| t.contains(r#"id="diff-col""#)));
}

#[tokio::test]
async fn archive_on_foreign_host_is_rejected_before_fetch() {
    let config = common::local_config().build().unwrap();
    // Any fetch would panic: validation must short-circuit
    let comparator = Comparator::with_fetcher(config, ScriptedFetcher::new());
    let request = ComparisonRequest::new(
        "http://169.254.169.254/latest/meta-data",
        "http://127.0.0.1/page",
        "127.0.0.1:8080",
    );
    let result = comparator.compare(&request).await;

    assert!(result.is_error);
    assert_eq!(
        result.error_a.as_deref(),
        Some("Error: Invalid or disallowed URL for archived content.")
    );
    assert_eq!(result.error_b, None);
    assert!(result.output.is_empty());
}

#[tokio::test]
async fn live_outside_official_domain_is_rejected() {
    let config = common::local_config().build().unwrap();
    let comparator = Comparator::with_fetcher(config, ScriptedFetcher::new());
    let request = ComparisonRequest::new(
        "http://127.0.0.1:8080/www.cdc.gov/page",
        "http://evil.example/page",
        "127.0.0.1:8080",
    );
    let result = comparator.compare(&request).await;

    assert!(result.is_error);
    assert_eq!(result.error_a, None);
    assert_eq!(
        result.error_b.as_deref(),
        Some("Error: Invalid or disallowed URL for live content (must be 127.0.0.1).")
    );
}

#[tokio::test]
async fn timeout_on_one_side_does_not_cancel_the_other() {
    let archived = "http://127.0.0.1:8080/snap";
    let live = "http://127.0.0.1/page";
    let fetcher = ScriptedFetcher::new()
        .respond_after(
            archived,
            Duration::from_millis(200),
            FetchOutcome::timeout(archived, Duration::from_secs(20)),
        )
        .respond_after(live, Duration::from_millis(200), FetchOutcome::success("fine"));

    let comparator =
        Comparator::with_fetcher(common::local_config().build().unwrap(), fetcher);
    let started = Instant::now();
    let result = comparator
        .compare(&ComparisonRequest::new(archived, live, "127.0.0.1:8080"))
        .await;

    // Both delays overlap when the fetches run concurrently
    assert!(started.elapsed() < Duration::from_millis(390));
    assert!(result.is_error);
    assert_eq!(
        result.error_a.as_deref(),
        Some("Error: Page load timed out after 20s for http://127.0.0.1:8080/snap")
    );
    assert_eq!(result.error_b, None);
    assert!(result.lines_a.is_empty());
    assert!(result.lines_b.is_empty());
}

#[tokio::test]
async fn both_sides_failing_reports_both_errors() {
    let archived = "http://127.0.0.1:8080/snap";
    let live = "http://127.0.0.1/page";
    let fetcher = ScriptedFetcher::new()
        .respond(archived, FetchOutcome::http_status(archived, 500, Some("Internal Server Error")))
        .respond(live, FetchOutcome::classified(FetchErrorKind::DnsResolution, live));

    let comparator =
        Comparator::with_fetcher(common::local_config().build().unwrap(), fetcher);
    let result = comparator
        .compare(&ComparisonRequest::new(archived, live, "127.0.0.1:8080"))
        .await;

    assert!(result.is_error);
    assert_eq!(
        result.error_a.as_deref(),
        Some("Error: HTTP Error 500 for http://127.0.0.1:8080/snap. Reason: Internal Server Error")
    );
    assert_eq!(
        result.error_b.as_deref(),
        Some("Error: Could not resolve hostname for http://127.0.0.1/page")
    );
}

#[tokio::test]
async fn panicking_fetch_task_becomes_side_error() {
    let archived = "http://127.0.0.1:8080/explode";
    let live = "http://127.0.0.1/page";
    let comparator =
        Comparator::with_fetcher(common::local_config().build().unwrap(), PanickingFetcher);
    let result = comparator
        .compare(&ComparisonRequest::new(archived, live, "127.0.0.1:8080"))
        .await;

    assert!(result.is_error);
    assert_eq!(
        result.error_a.as_deref(),
        Some("Error: Fetch failed for http://127.0.0.1:8080/explode. See server logs.")
    );
    assert!(result.error_b.is_some());
}

#[tokio::test]
async fn noise_lines_never_reach_the_diff() {
    let archived = "http://127.0.0.1:8080/snap";
    let live = "http://127.0.0.1/page";
    let fetcher = ScriptedFetcher::new()
        .respond(archived, FetchOutcome::success("Heading\nvar WB$wombat = 1;\nBody"))
        .respond(live, FetchOutcome::success("Heading\nBody\nCDC_POST=abc"));

    let comparator =
        Comparator::with_fetcher(common::local_config().build().unwrap(), fetcher);
    let result = comparator
        .compare(&ComparisonRequest::new(archived, live, "127.0.0.1:8080"))
        .await;

    assert!(!result.is_error);
    assert_eq!(result.lines_a, result.lines_b);
    assert!(
        result
            .output
            .instructions()
            .expect("instruction mode")
            .iter()
            .all(|i| i.kind() == InstructionKind::Unchanged)
    );
}

#[tokio::test]
async fn result_serializes_with_expected_keys() {
    let archived = "http://127.0.0.1:8080/snap";
    let live = "http://127.0.0.1/page";
    let fetcher = ScriptedFetcher::new()
        .respond(archived, FetchOutcome::success("a"))
        .respond(live, FetchOutcome::success("a\nb"));

    let comparator =
        Comparator::with_fetcher(common::local_config().build().unwrap(), fetcher);
    let result = comparator
        .compare(&ComparisonRequest::new(archived, live, "127.0.0.1:8080"))
        .await;
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(
        value["instructions"],
        serde_json::json!([
            {"type": "unchanged", "index_b": 0},
            {"type": "added", "index_b": 1}
        ])
    );
    assert_eq!(value["lines_b"][1], serde_json::json!({"depth": 0, "text": "b"}));
    assert_eq!(value["is_error"], serde_json::json!(false));
    assert!(value["timestamp"].as_str().is_some_and(|t| t.ends_with("UTC")));
}

const ARCHIVED: &str = "http://127.0.0.1:8080/snap";
const LIVE: &str = "http://127.0.0.1/page";

async fn compare_scripted(archived: FetchOutcome, live: FetchOutcome) -> ComparisonResult {
    let fetcher = ScriptedFetcher::new()
        .respond(ARCHIVED, archived)
        .respond(LIVE, live);
    let comparator =
        Comparator::with_fetcher(common::local_config().build().unwrap(), fetcher);
    comparator
        .compare(&ComparisonRequest::new(ARCHIVED, LIVE, "127.0.0.1:8080"))
        .await
}

fn assert_no_diff(result: &ComparisonResult) {
    assert!(result.is_error);
    assert!(result.lines_a.is_empty());
    assert!(result.lines_b.is_empty());
    assert!(result.output.is_empty());
}

#[tokio::test]
async fn oversized_archive_skips_the_diff() {
    let result = compare_scripted(
        FetchOutcome::size_limit(ARCHIVED, 10 * 1024 * 1024),
        FetchOutcome::success("live text"),
    )
    .await;

    assert_no_diff(&result);
    assert_eq!(
        result.error_a.as_deref(),
        Some("Error: Content exceeds size limit (10MB) for http://127.0.0.1:8080/snap.")
    );
    assert_eq!(result.error_b, None);
}

#[tokio::test]
async fn live_timeout_lands_in_the_live_slot() {
    let result = compare_scripted(
        FetchOutcome::success("archived text"),
        FetchOutcome::timeout(LIVE, Duration::from_secs(20)),
    )
    .await;

    assert_no_diff(&result);
    assert_eq!(result.error_a, None);
    assert_eq!(
        result.error_b.as_deref(),
        Some("Error: Page load timed out after 20s for http://127.0.0.1/page")
    );
}

#[tokio::test]
async fn every_failure_kind_is_reported_on_its_own_side() {
    let kinds = [
        FetchErrorKind::DnsResolution,
        FetchErrorKind::ConnectionRefused,
        FetchErrorKind::NavigationTimeout,
        FetchErrorKind::HttpStatus,
        FetchErrorKind::ContentExtraction,
        FetchErrorKind::SizeLimitExceeded,
        FetchErrorKind::Unexpected,
    ];

    for kind in kinds {
        let failed = FetchOutcome::classified(kind, ARCHIVED);
        let expected = match &failed {
            FetchOutcome::Failure { message, .. } => message.clone(),
            FetchOutcome::Success { .. } => unreachable!("classified outcomes are failures"),
        };
        let result = compare_scripted(failed, FetchOutcome::success("live text")).await;
        assert_no_diff(&result);
        assert_eq!(result.error_a.as_deref(), Some(expected.as_str()), "{kind:?}");
        assert_eq!(result.error_b, None, "{kind:?}");

        let failed = FetchOutcome::classified(kind, LIVE);
        let expected = match &failed {
            FetchOutcome::Failure { message, .. } => message.clone(),
            FetchOutcome::Success { .. } => unreachable!("classified outcomes are failures"),
        };
        let result = compare_scripted(FetchOutcome::success("archived text"), failed).await;
        assert_no_diff(&result);
        assert_eq!(result.error_a, None, "{kind:?}");
        assert_eq!(result.error_b.as_deref(), Some(expected.as_str()), "{kind:?}");
    }
}
