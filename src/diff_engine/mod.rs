//! Sequence alignment over extracted text units
//!
//! Alignment is keyed on each unit's trimmed text. Depth rides along for the
//! formatters but never influences which lines match.

pub mod matcher;
pub mod opcode;

pub use matcher::{MatchingBlock, SequenceMatcher};
pub use opcode::{DiffOpcode, DiffTag, ReplaceSplit};

use crate::text_extractor::TextUnit;

/// Align `seq_a` against `seq_b`
///
/// Opcodes cover both sequences contiguously and appear in increasing order
/// of position on both sides.
#[must_use]
pub fn diff(seq_a: &[TextUnit], seq_b: &[TextUnit]) -> Vec<DiffOpcode> {
    let keys_a: Vec<&str> = seq_a.iter().map(|u| u.text.trim()).collect();
    let keys_b: Vec<&str> = seq_b.iter().map(|u| u.text.trim()).collect();

    let opcodes = SequenceMatcher::new(&keys_a, &keys_b).opcodes();
    log::debug!(
        "Aligned {} vs {} units into {} opcodes",
        seq_a.len(),
        seq_b.len(),
        opcodes.len()
    );
    opcodes
}
