use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Classification of one aligned run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffTag {
    Equal,
    Insert,
    Delete,
    Replace,
}

/// A tagged pair of half-open ranges into sequence A and sequence B
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffOpcode {
    pub tag: DiffTag,
    pub range_a: Range<usize>,
    pub range_b: Range<usize>,
}

/// How a `replace` run splits into paired lines and unpaired leftovers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceSplit {
    /// `(index_a, index_b)` pairs, position-for-position from the run start
    pub paired: Vec<(usize, usize)>,
    /// A-side indices beyond the paired prefix (pure removals)
    pub removed: Range<usize>,
    /// B-side indices beyond the paired prefix (pure additions)
    pub added: Range<usize>,
}

impl DiffOpcode {
    #[must_use]
    pub fn new(tag: DiffTag, range_a: Range<usize>, range_b: Range<usize>) -> Self {
        Self {
            tag,
            range_a,
            range_b,
        }
    }

    #[must_use]
    pub fn equal(range_a: Range<usize>, range_b: Range<usize>) -> Self {
        Self::new(DiffTag::Equal, range_a, range_b)
    }

    #[must_use]
    pub fn replace(range_a: Range<usize>, range_b: Range<usize>) -> Self {
        Self::new(DiffTag::Replace, range_a, range_b)
    }

    /// Pair the first `min(len_a, len_b)` lines of each side; the longer
    /// side's excess is left over in original order.
    ///
    /// Meaningful for any tag: for `delete`/`insert` nothing pairs and the
    /// whole run is excess.
    #[must_use]
    pub fn split_replace(&self) -> ReplaceSplit {
        let common = self.range_a.len().min(self.range_b.len());
        let paired = self
            .range_a
            .clone()
            .zip(self.range_b.clone())
            .take(common)
            .collect();
        ReplaceSplit {
            paired,
            removed: self.range_a.start + common..self.range_a.end,
            added: self.range_b.start + common..self.range_b.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uneven_replace_leaves_excess_on_longer_side() {
        let split = DiffOpcode::replace(2..5, 7..8).split_replace();
        assert_eq!(split.paired, vec![(2, 7)]);
        assert_eq!(split.removed, 3..5);
        assert!(split.added.is_empty());

        let split = DiffOpcode::replace(0..1, 0..3).split_replace();
        assert_eq!(split.paired, vec![(0, 0)]);
        assert!(split.removed.is_empty());
        assert_eq!(split.added, 1..3);
    }

    #[test]
    fn tag_serializes_snake_case() {
        let json = serde_json::to_string(&DiffTag::Replace).expect("serialize");
        assert_eq!(json, "\"replace\"");
    }
}
