//! Fatal errors raised while turning chains into alignments.
//!
//! Drops, empty chain sets and E-value filtering are ordinary control flow and
//! never surface here. An `AlignError` means the inputs violated an invariant
//! the extender relies on, so callers abort the query and propagate it.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlignError {
    /// An aligner produced an edit operation outside `M = X I D`.
    MalformedCigar { symbol: char },
    /// Two consecutive chain anchors do not advance in both sequences, or
    /// overlap in a way none of the stitching cases covers.
    UnmatchedAnchorOverlap {
        anchor_index: usize,
        query_distance: i64,
        target_distance: i64,
    },
}

impl fmt::Display for AlignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignError::MalformedCigar { symbol } => {
                write!(f, "Invalid CIGAR operation '{}' returned by aligner", symbol)
            }
            AlignError::UnmatchedAnchorOverlap {
                anchor_index,
                query_distance,
                target_distance,
            } => write!(
                f,
                "Unmatched anchor overlap at anchor {} (query distance {}, target distance {})",
                anchor_index, query_distance, target_distance
            ),
        }
    }
}

impl std::error::Error for AlignError {}
