//! Text extraction: fetched content to comparable text units
//!
//! Two modes share one output type, [`TextUnit`]:
//! - **flat** splits plain text into depth-0 lines
//! - **hierarchical** walks the parsed document and emits `(depth, text)`
//!   records, one per block-level element run
//!
//! Both paths finish with noise filtering and depth normalization, so the
//! diff engine always sees a clean, bounded sequence.

pub mod flat;
pub mod hierarchy;
pub mod normalize;
pub mod unit;

pub use flat::extract_lines;
pub use hierarchy::{BLOCK_TAGS, SKIPPED_TAGS, extract_hierarchy, html_to_text};
pub use normalize::{filter_noise, normalize_depths};
pub use unit::TextUnit;

use crate::config::ExtractionMode;

/// Run the full extraction pipeline for one side of a comparison
///
/// Noise is filtered before depth normalization so that dropping a unit can
/// never leave a depth jump greater than one behind.
#[must_use]
pub fn extract(content: &str, mode: ExtractionMode, noise_markers: &[String]) -> Vec<TextUnit> {
    let raw = match mode {
        ExtractionMode::Flat => extract_lines(content),
        ExtractionMode::Hierarchical => extract_hierarchy(content),
    };
    let filtered = filter_noise(raw, noise_markers);
    log::debug!(
        "Extracted {} text units ({:?} mode)",
        filtered.len(),
        mode
    );
    normalize_depths(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hierarchical_pipeline_filters_then_normalizes() {
        let html = r#"<body>
            <div><div><div><p>deep</p></div></div></div>
            <p>WB$wombat injected</p>
            <p>tail</p>
        </body>"#;
        let units = extract(html, ExtractionMode::Hierarchical, &["WB$wombat".to_string()]);
        let texts: Vec<&str> = units.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["deep", "tail"]);
        assert_eq!(units[0].depth, 0);
        assert!(units[1].depth <= 1);
    }

    #[test]
    fn flat_pipeline_keeps_line_order() {
        let units = extract("  one \ntwo\n\nthree", ExtractionMode::Flat, &[]);
        let texts: Vec<&str> = units.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "", "three"]);
        assert!(units.iter().all(|u| u.depth == 0));
    }
}
