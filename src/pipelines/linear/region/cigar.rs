//! Edit script accumulated while a chain is stitched into an alignment.
//!
//! The script grows strictly by appending. Runs are never merged, so an
//! index recorded by [`ExtensionCigar::record_peak`] always marks an op
//! boundary that [`ExtensionCigar::truncate_to_peak`] can cut back to.

use crate::core::alignment::{AlignMode, AlignResult, AlignmentStatus, CigarOp};
use crate::core::error::AlignError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionCigar {
    ops: Vec<(u32, CigarOp)>,
    pub score: i32,
    pub peak_score: i32,
    pub peak_cigar_index: usize,
    pub peak_anchor_index: usize,
    query_extension_distance: i32,
    target_extension_distance: i32,
}

impl ExtensionCigar {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ops: Vec::with_capacity(capacity),
            score: 0,
            peak_score: 0,
            peak_cigar_index: 0,
            peak_anchor_index: 0,
            query_extension_distance: -1,
            target_extension_distance: -1,
        }
    }

    pub fn ops(&self) -> &[(u32, CigarOp)] {
        &self.ops
    }

    /// 0-based index of the furthest query base reached by left extension,
    /// counted back from the first anchor; `-1` if none.
    pub fn query_extension_distance(&self) -> i32 {
        self.query_extension_distance
    }

    pub fn target_extension_distance(&self) -> i32 {
        self.target_extension_distance
    }

    pub fn set_extension_distances(&mut self, query: i32, target: i32) {
        self.query_extension_distance = query;
        self.target_extension_distance = target;
    }

    /// Append a run. Zero-length runs are dropped.
    #[inline]
    pub fn push(&mut self, len: u32, op: CigarOp) {
        if len > 0 {
            self.ops.push((len, op));
        }
    }

    /// Validate and append raw aligner output.
    ///
    /// Nothing is appended if any op is unknown.
    pub fn extend_from_aligner(&mut self, raw: &[(u8, u32)]) -> Result<(), AlignError> {
        let converted = raw
            .iter()
            .map(|&(op, len)| CigarOp::try_from(op).map(|op| (len, op)))
            .collect::<Result<Vec<_>, _>>()?;
        self.ops.extend(converted.into_iter().filter(|&(len, _)| len > 0));
        Ok(())
    }

    /// Remember the current state if the score is a new maximum.
    pub fn record_peak(&mut self, anchor_index: usize) {
        if self.score > self.peak_score {
            self.peak_score = self.score;
            self.peak_cigar_index = self.ops.len();
            self.peak_anchor_index = anchor_index;
        }
    }

    /// Drop everything appended after the recorded peak.
    pub fn truncate_to_peak(&mut self) {
        self.ops.truncate(self.peak_cigar_index);
        self.score = self.peak_score;
    }

    /// Fold one aligner result into the script.
    ///
    /// The result's score is added in every mode. `Left` also records how far
    /// the extension reached. In `Right` and `Global` mode a total below 1
    /// is reported as [`AlignmentStatus::NegativeScore`] and nothing is
    /// committed.
    pub fn apply(&mut self, result: &AlignResult, mode: AlignMode) -> Result<AlignmentStatus, AlignError> {
        let total = self.score + result.score;
        if mode != AlignMode::Left && total < 1 {
            return Ok(AlignmentStatus::NegativeScore);
        }

        self.extend_from_aligner(&result.cigar)?;
        self.score = total;
        if mode == AlignMode::Left {
            self.set_extension_distances(result.max_query, result.max_target);
        }
        Ok(result.status)
    }

    /// Query and target bases covered by the script.
    pub fn consumed(&self) -> (i32, i32) {
        self.ops.iter().fold((0, 0), |(q, t), &(len, op)| {
            let len = len as i32;
            (
                q + if op.consumes_query() { len } else { 0 },
                t + if op.consumes_target() { len } else { 0 },
            )
        })
    }
}
