//! Diff output shapes
//!
//! - instruction list: index-referencing, small payload for a remote renderer
//! - HTML fragment: styled `<div>` lines, indented by depth

pub mod errors;
pub mod formatter;
pub mod instruction;

pub use errors::{OutputError, OutputResult};
pub use formatter::{DiffFormatter, HtmlFragmentFormatter, InstructionFormatter, formatter_for};
pub use instruction::{InstructionKind, RenderInstruction};

use serde::{Deserialize, Serialize};

use crate::text_extractor::TextUnit;

/// Inline style applied to removed lines
pub const REMOVED_STYLE: &str = "background-color: #fadad7; color: #b30000;";

/// Inline style applied to added lines
pub const ADDED_STYLE: &str = "background-color: #eaf2c2; color: #406619;";

/// Formatted diff, serialized as either `instructions` or `html_fragment`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffOutput {
    Instructions(Vec<RenderInstruction>),
    HtmlFragment(String),
}

impl DiffOutput {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Instructions(v) => v.is_empty(),
            Self::HtmlFragment(s) => s.is_empty(),
        }
    }

    #[must_use]
    pub fn instructions(&self) -> Option<&[RenderInstruction]> {
        match self {
            Self::Instructions(v) => Some(v),
            Self::HtmlFragment(_) => None,
        }
    }

    #[must_use]
    pub fn html_fragment(&self) -> Option<&str> {
        match self {
            Self::HtmlFragment(s) => Some(s),
            Self::Instructions(_) => None,
        }
    }
}

/// Table embedding both full texts in hidden cells next to the visible diff
///
/// Cell ids `a`, `b` and `diff-col` plus the `result` span are what the
/// client-side filter script looks up.
#[must_use]
pub fn comparison_table(lines_a: &[TextUnit], lines_b: &[TextUnit], diff_html: &str) -> String {
    let text_a = HtmlFragmentFormatter::plain(lines_a);
    let text_b = HtmlFragmentFormatter::plain(lines_b);
    format!(
        r#"<table>
  <tbody>
    <tr>
      <td id="a" style="display: none;">{text_a}</td>
      <td id="b" style="display: none;">{text_b}</td>
      <td id="diff-col">
        <span id="result" class="highlightable-filter">{diff_html}</span>
      </td>
    </tr>
  </tbody>
</table>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn output_serializes_under_shape_key() {
        let v = serde_json::to_value(DiffOutput::Instructions(vec![RenderInstruction::added(0)]))
            .expect("serialize");
        assert_eq!(v, json!({"instructions": [{"type": "added", "index_b": 0}]}));

        let v = serde_json::to_value(DiffOutput::HtmlFragment("<div></div>".into()))
            .expect("serialize");
        assert_eq!(v, json!({"html_fragment": "<div></div>"}));
    }

    #[test]
    fn table_holds_hidden_cells_and_diff() {
        let a = vec![TextUnit::line("alpha")];
        let b = vec![TextUnit::line("beta")];
        let table = comparison_table(&a, &b, "<div>diff</div>");
        assert!(table.contains(
            r#"<td id="a" style="display: none;"><div style="margin-left: 0px; margin-bottom: 0;">alpha</div></td>"#
        ));
        assert!(table.contains(r#"<td id="b" style="display: none;">"#));
        assert!(table.contains(r#"<span id="result" class="highlightable-filter"><div>diff</div></span>"#));
    }
}
