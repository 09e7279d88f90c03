//! Longest-matching-block sequence alignment
//!
//! Recursively finds the longest contiguous run common to both sequences,
//! then aligns what lies to its left and right the same way. Every element
//! takes part in matching: there is no junk heuristic and no popularity
//! cut-off, so frequently repeated lines (blank lines, list bullets) still
//! anchor the alignment.

use std::collections::HashMap;
use std::hash::Hash;

use super::opcode::{DiffOpcode, DiffTag};

/// A contiguous run where `a[a_start..a_start + len] == b[b_start..b_start + len]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingBlock {
    pub a_start: usize,
    pub b_start: usize,
    pub len: usize,
}

/// Aligns two sequences of hashable items
pub struct SequenceMatcher<'a, T: Eq + Hash> {
    a: &'a [T],
    b: &'a [T],
    /// Positions in `b` of each distinct item, ascending
    b_index: HashMap<&'a T, Vec<usize>>,
}

impl<'a, T: Eq + Hash> SequenceMatcher<'a, T> {
    #[must_use]
    pub fn new(a: &'a [T], b: &'a [T]) -> Self {
        let mut b_index: HashMap<&'a T, Vec<usize>> = HashMap::new();
        for (j, item) in b.iter().enumerate() {
            b_index.entry(item).or_default().push(j);
        }
        Self { a, b, b_index }
    }

    /// Longest matching run inside `a[a_lo..a_hi]` and `b[b_lo..b_hi]`
    ///
    /// Ties resolve to the run starting earliest in `a`, then earliest in `b`.
    /// Returns a zero-length block at `(a_lo, b_lo)` when nothing matches.
    #[must_use]
    pub fn find_longest_match(
        &self,
        a_lo: usize,
        a_hi: usize,
        b_lo: usize,
        b_hi: usize,
    ) -> MatchingBlock {
        let mut best = MatchingBlock {
            a_start: a_lo,
            b_start: b_lo,
            len: 0,
        };
        // run length of the match ending at (i - 1, j), keyed by j
        let mut run_ending: HashMap<usize, usize> = HashMap::new();

        for i in a_lo..a_hi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b_index.get(&self.a[i]) {
                for &j in positions {
                    if j < b_lo {
                        continue;
                    }
                    if j >= b_hi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| run_ending.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > best.len {
                        best = MatchingBlock {
                            a_start: i + 1 - k,
                            b_start: j + 1 - k,
                            len: k,
                        };
                    }
                }
            }
            run_ending = next;
        }

        best
    }

    /// All maximal matching runs in ascending order, adjacent runs merged,
    /// terminated by a zero-length sentinel at `(len_a, len_b)`
    #[must_use]
    pub fn matching_blocks(&self) -> Vec<MatchingBlock> {
        let (len_a, len_b) = (self.a.len(), self.b.len());
        let mut found = Vec::new();
        let mut pending = vec![(0, len_a, 0, len_b)];

        while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
            let m = self.find_longest_match(a_lo, a_hi, b_lo, b_hi);
            if m.len == 0 {
                continue;
            }
            found.push(m);
            if a_lo < m.a_start && b_lo < m.b_start {
                pending.push((a_lo, m.a_start, b_lo, m.b_start));
            }
            let (a_end, b_end) = (m.a_start + m.len, m.b_start + m.len);
            if a_end < a_hi && b_end < b_hi {
                pending.push((a_end, a_hi, b_end, b_hi));
            }
        }
        found.sort_by_key(|m| (m.a_start, m.b_start));

        let mut merged: Vec<MatchingBlock> = Vec::with_capacity(found.len() + 1);
        for m in found {
            match merged.last_mut() {
                Some(last)
                    if last.a_start + last.len == m.a_start
                        && last.b_start + last.len == m.b_start =>
                {
                    last.len += m.len;
                }
                _ => merged.push(m),
            }
        }
        merged.push(MatchingBlock {
            a_start: len_a,
            b_start: len_b,
            len: 0,
        });
        merged
    }

    /// Opcodes that turn `a` into `b`, covering both sequences end to end
    #[must_use]
    pub fn opcodes(&self) -> Vec<DiffOpcode> {
        let mut opcodes = Vec::new();
        let (mut i, mut j) = (0, 0);

        for block in self.matching_blocks() {
            let tag = match (i < block.a_start, j < block.b_start) {
                (true, true) => Some(DiffTag::Replace),
                (true, false) => Some(DiffTag::Delete),
                (false, true) => Some(DiffTag::Insert),
                (false, false) => None,
            };
            if let Some(tag) = tag {
                opcodes.push(DiffOpcode::new(tag, i..block.a_start, j..block.b_start));
            }
            i = block.a_start + block.len;
            j = block.b_start + block.len;
            if block.len > 0 {
                opcodes.push(DiffOpcode::equal(block.a_start..i, block.b_start..j));
            }
        }

        opcodes
    }
}
