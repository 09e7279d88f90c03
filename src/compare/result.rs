use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::{CompareError, Side};
use crate::config::OutputMode;
use crate::output::{DiffOutput, comparison_table};
use crate::text_extractor::TextUnit;

/// Format used for `ComparisonResult::timestamp`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Input to one comparison call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRequest {
    pub archived_url: String,
    pub live_url: String,
    /// `host[:port]` the inbound request arrived on; scopes the archived URL
    pub caller_host: String,
}

impl ComparisonRequest {
    #[must_use]
    pub fn new(
        archived_url: impl Into<String>,
        live_url: impl Into<String>,
        caller_host: impl Into<String>,
    ) -> Self {
        Self {
            archived_url: archived_url.into(),
            live_url: live_url.into(),
            caller_host: caller_host.into(),
        }
    }
}

/// Outcome of one comparison call, success or error
///
/// On error `lines_a`, `lines_b` and the diff output are all empty; the
/// failing side's message sits in `error_a` or `error_b`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub lines_a: Vec<TextUnit>,
    pub lines_b: Vec<TextUnit>,
    #[serde(flatten)]
    pub output: DiffOutput,
    pub is_error: bool,
    pub error_a: Option<String>,
    pub error_b: Option<String>,
    pub timestamp: String,
}

fn empty_output(mode: OutputMode) -> DiffOutput {
    match mode {
        OutputMode::Instructions => DiffOutput::Instructions(Vec::new()),
        OutputMode::HtmlFragment => DiffOutput::HtmlFragment(String::new()),
    }
}

#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

impl ComparisonResult {
    #[must_use]
    pub fn success(lines_a: Vec<TextUnit>, lines_b: Vec<TextUnit>, output: DiffOutput) -> Self {
        Self {
            lines_a,
            lines_b,
            output,
            is_error: false,
            error_a: None,
            error_b: None,
            timestamp: format_timestamp(Utc::now()),
        }
    }

    /// Error result with the given per-side errors and nothing else
    #[must_use]
    pub fn failure(
        mode: OutputMode,
        error_a: Option<&CompareError>,
        error_b: Option<&CompareError>,
    ) -> Self {
        Self {
            lines_a: Vec::new(),
            lines_b: Vec::new(),
            output: empty_output(mode),
            is_error: true,
            error_a: error_a.map(ToString::to_string),
            error_b: error_b.map(ToString::to_string),
            timestamp: format_timestamp(Utc::now()),
        }
    }

    /// Error result for a single side
    #[must_use]
    pub fn rejected(mode: OutputMode, side: Side, error: &CompareError) -> Self {
        match side {
            Side::Archived => Self::failure(mode, Some(error), None),
            Side::Live => Self::failure(mode, None, Some(error)),
        }
    }

    /// Record a processing error in every slot that has no error yet
    pub fn mark_processing_error(&mut self) {
        let message = CompareError::DiffProcessing.to_string();
        self.is_error = true;
        self.error_a.get_or_insert_with(|| message.clone());
        self.error_b.get_or_insert(message);
    }

    #[must_use]
    pub fn error_for(&self, side: Side) -> Option<&str> {
        match side {
            Side::Archived => self.error_a.as_deref(),
            Side::Live => self.error_b.as_deref(),
        }
    }

    /// Table with hidden full-text cells around the HTML diff
    ///
    /// `None` for instruction-list results and error results.
    #[must_use]
    pub fn html_table(&self) -> Option<String> {
        if self.is_error {
            return None;
        }
        self.output
            .html_fragment()
            .map(|diff| comparison_table(&self.lines_a, &self.lines_b, diff))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn timestamp_format() {
        let at = Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).single().expect("valid date");
        assert_eq!(format_timestamp(at), "2025-03-04 05:06:07 UTC");
    }

    #[test]
    fn processing_error_keeps_existing_message() {
        let mut result = ComparisonResult::failure(
            OutputMode::Instructions,
            Some(&CompareError::Timeout {
                message: "Error: Page load timed out after 20s for u".into(),
            }),
            None,
        );
        result.mark_processing_error();
        assert_eq!(
            result.error_a.as_deref(),
            Some("Error: Page load timed out after 20s for u")
        );
        assert_eq!(
            result.error_b.as_deref(),
            Some("Error: Internal error during comparison processing.")
        );
    }

    #[test]
    fn serializes_all_required_fields() {
        let result = ComparisonResult::rejected(
            OutputMode::Instructions,
            Side::Live,
            &CompareError::Validation {
                side: Side::Live,
                live_domain: "cdc.gov".into(),
            },
        );
        let value = serde_json::to_value(&result).expect("serialize");
        assert_eq!(value["lines_a"], json!([]));
        assert_eq!(value["lines_b"], json!([]));
        assert_eq!(value["instructions"], json!([]));
        assert_eq!(value["is_error"], json!(true));
        assert_eq!(value["error_a"], json!(null));
        assert_eq!(
            value["error_b"],
            json!("Error: Invalid or disallowed URL for live content (must be cdc.gov).")
        );
        assert!(value["timestamp"].as_str().is_some_and(|t| t.ends_with(" UTC")));
    }

    #[test]
    fn html_table_only_for_html_success() {
        let ok = ComparisonResult::success(
            vec![TextUnit::line("a")],
            vec![TextUnit::line("a")],
            DiffOutput::HtmlFragment("<div>a</div>".into()),
        );
        assert!(ok.html_table().is_some_and(|t| t.contains("diff-col")));

        let instructions =
            ComparisonResult::success(Vec::new(), Vec::new(), DiffOutput::Instructions(Vec::new()));
        assert!(instructions.html_table().is_none());
    }
}
