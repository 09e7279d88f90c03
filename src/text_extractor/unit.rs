use serde::{Deserialize, Serialize};

/// One comparable unit of page text
///
/// `depth` is the block nesting level for hierarchical extraction and always
/// 0 for flat extraction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextUnit {
    pub depth: usize,
    pub text: String,
}

impl TextUnit {
    #[must_use]
    pub fn new(depth: usize, text: impl Into<String>) -> Self {
        Self {
            depth,
            text: text.into(),
        }
    }

    /// Flat-mode unit
    #[must_use]
    pub fn line(text: impl Into<String>) -> Self {
        Self::new(0, text)
    }
}
