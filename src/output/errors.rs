//! Formatter errors

use thiserror::Error;

use crate::compare::Side;

/// Result type alias for formatter operations
pub type OutputResult<T> = Result<T, OutputError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OutputError {
    /// An opcode referenced lines past the end of a sequence
    #[error("Opcode range {start}..{end} exceeds {side} sequence of length {len}")]
    RangeOutOfBounds {
        side: Side,
        start: usize,
        end: usize,
        len: usize,
    },

    /// An opcode range runs backwards
    #[error("Opcode range {start}..{end} on {side} side is inverted")]
    InvertedRange { side: Side, start: usize, end: usize },
}
