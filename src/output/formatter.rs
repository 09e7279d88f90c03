//! Opcode-to-output formatters
//!
//! Both formatters consume the same opcode list, so the choice of output
//! shape never changes how the two pages were aligned.

use std::ops::Range;

use super::errors::{OutputError, OutputResult};
use super::instruction::RenderInstruction;
use super::{ADDED_STYLE, DiffOutput, REMOVED_STYLE};
use crate::compare::Side;
use crate::config::OutputMode;
use crate::diff_engine::{DiffOpcode, DiffTag};
use crate::text_extractor::TextUnit;

/// Turns an opcode list into one of the [`DiffOutput`] shapes
pub trait DiffFormatter: Send + Sync {
    /// # Errors
    ///
    /// Returns an error when an opcode range does not fit the sequences.
    fn format(
        &self,
        seq_a: &[TextUnit],
        seq_b: &[TextUnit],
        opcodes: &[DiffOpcode],
    ) -> OutputResult<DiffOutput>;
}

/// Formatter for the configured output mode
#[must_use]
pub fn formatter_for(mode: OutputMode) -> Box<dyn DiffFormatter> {
    match mode {
        OutputMode::Instructions => Box::new(InstructionFormatter),
        OutputMode::HtmlFragment => Box::new(HtmlFragmentFormatter),
    }
}

fn check_range(range: &Range<usize>, len: usize, side: Side) -> OutputResult<()> {
    if range.start > range.end {
        return Err(OutputError::InvertedRange {
            side,
            start: range.start,
            end: range.end,
        });
    }
    if range.end > len {
        return Err(OutputError::RangeOutOfBounds {
            side,
            start: range.start,
            end: range.end,
            len,
        });
    }
    Ok(())
}

fn check_opcode(op: &DiffOpcode, len_a: usize, len_b: usize) -> OutputResult<()> {
    check_range(&op.range_a, len_a, Side::Archived)?;
    check_range(&op.range_b, len_b, Side::Live)
}

/// Index-referencing instruction list
///
/// - `equal`: one `unchanged` per line, indexed into B
/// - `delete`: one `removed` per line, indexed into A
/// - `insert`: one `added` per line, indexed into B
/// - `replace`: paired `replace` lines, then leftover removals or additions
#[derive(Debug, Clone, Copy, Default)]
pub struct InstructionFormatter;

impl InstructionFormatter {
    /// # Errors
    ///
    /// Returns an error when an opcode range does not fit the sequences.
    pub fn instructions(
        &self,
        len_a: usize,
        len_b: usize,
        opcodes: &[DiffOpcode],
    ) -> OutputResult<Vec<RenderInstruction>> {
        let mut out = Vec::with_capacity(len_a.max(len_b));

        for op in opcodes {
            check_opcode(op, len_a, len_b)?;
            match op.tag {
                DiffTag::Equal => out.extend(op.range_b.clone().map(RenderInstruction::unchanged)),
                DiffTag::Delete => out.extend(op.range_a.clone().map(RenderInstruction::removed)),
                DiffTag::Insert => out.extend(op.range_b.clone().map(RenderInstruction::added)),
                DiffTag::Replace => {
                    let split = op.split_replace();
                    out.extend(
                        split
                            .paired
                            .iter()
                            .map(|&(a, b)| RenderInstruction::replace(a, b)),
                    );
                    out.extend(split.removed.map(RenderInstruction::removed));
                    out.extend(split.added.map(RenderInstruction::added));
                }
            }
        }

        Ok(out)
    }
}

impl DiffFormatter for InstructionFormatter {
    fn format(
        &self,
        seq_a: &[TextUnit],
        seq_b: &[TextUnit],
        opcodes: &[DiffOpcode],
    ) -> OutputResult<DiffOutput> {
        self.instructions(seq_a.len(), seq_b.len(), opcodes)
            .map(DiffOutput::Instructions)
    }
}

/// Styled, flattened HTML fragment
///
/// Equal runs are written once from A, removed lines are wrapped in the
/// removed style, added lines in the added style. A replace run emits all of
/// its removed lines before its added lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlFragmentFormatter;

impl HtmlFragmentFormatter {
    fn push_line(out: &mut String, unit: &TextUnit, style: Option<&str>) {
        let text = html_escape::encode_text(&unit.text);
        let margin = unit.depth.saturating_mul(10);
        out.push_str(&match style {
            Some(style) => format!(
                r#"<div style="margin-left: {margin}px; margin-bottom: 0;"><span style="{style}">{text}</span></div>"#
            ),
            None => format!(r#"<div style="margin-left: {margin}px; margin-bottom: 0;">{text}</div>"#),
        });
    }

    fn push_run(out: &mut String, units: &[TextUnit], style: Option<&str>) {
        for unit in units {
            Self::push_line(out, unit, style);
        }
    }

    /// Render units without styling, as used for the hidden full-text cells
    #[must_use]
    pub fn plain(units: &[TextUnit]) -> String {
        let mut out = String::new();
        Self::push_run(&mut out, units, None);
        out
    }
}

impl DiffFormatter for HtmlFragmentFormatter {
    fn format(
        &self,
        seq_a: &[TextUnit],
        seq_b: &[TextUnit],
        opcodes: &[DiffOpcode],
    ) -> OutputResult<DiffOutput> {
        let mut out = String::new();

        for op in opcodes {
            check_opcode(op, seq_a.len(), seq_b.len())?;
            let removed = &seq_a[op.range_a.clone()];
            let added = &seq_b[op.range_b.clone()];
            match op.tag {
                DiffTag::Equal => Self::push_run(&mut out, removed, None),
                DiffTag::Delete => Self::push_run(&mut out, removed, Some(REMOVED_STYLE)),
                DiffTag::Insert => Self::push_run(&mut out, added, Some(ADDED_STYLE)),
                DiffTag::Replace => {
                    Self::push_run(&mut out, removed, Some(REMOVED_STYLE));
                    Self::push_run(&mut out, added, Some(ADDED_STYLE));
                }
            }
        }

        Ok(DiffOutput::HtmlFragment(out))
    }
}
