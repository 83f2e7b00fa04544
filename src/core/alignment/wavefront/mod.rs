//! Gap-affine wavefront aligner.

pub mod implementation;

pub use implementation::{wavefront_align, WavefrontPenalties, WavefrontStore, WfaOutcome};

use super::aligner::Aligner;
use super::types::{AlignMode, AlignResult, AlignmentStatus};
use crate::core::stats::GapScoring;

pub struct WavefrontAligner {
    scoring: GapScoring,
    penalties: WavefrontPenalties,
    store: WavefrontStore,
}

impl WavefrontAligner {
    pub fn new(scoring: GapScoring) -> Self {
        Self {
            scoring,
            penalties: WavefrontPenalties::from_scoring(scoring),
            store: WavefrontStore::default(),
        }
    }
}

impl Aligner for WavefrontAligner {
    fn align(
        &mut self,
        target: &[u8],
        query: &[u8],
        mode: AlignMode,
        band: i32,
        zdrop: i32,
    ) -> AlignResult {
        if query.is_empty() || target.is_empty() {
            if mode != AlignMode::Global || (query.is_empty() && target.is_empty()) {
                return AlignResult::empty();
            }
            let (op, len) = if query.is_empty() {
                (b'D', target.len())
            } else {
                (b'I', query.len())
            };
            return AlignResult {
                status: AlignmentStatus::NotDropped,
                cigar: vec![(op, len as u32)],
                score: -self.scoring.gap_cost(len as i32),
                max_query: query.len() as i32 - 1,
                max_target: target.len() as i32 - 1,
            };
        }

        let out = match mode {
            AlignMode::Left => {
                let q: Vec<u8> = query.iter().rev().copied().collect();
                let t: Vec<u8> = target.iter().rev().copied().collect();
                let mut out =
                    wavefront_align(&mut self.store, self.penalties, &t, &q, false, band, zdrop);
                out.cigar.reverse();
                out
            }
            AlignMode::Right => {
                wavefront_align(&mut self.store, self.penalties, target, query, false, band, zdrop)
            }
            AlignMode::Global => {
                wavefront_align(&mut self.store, self.penalties, target, query, true, band, zdrop)
            }
        };

        AlignResult {
            status: if out.dropped {
                AlignmentStatus::Dropped
            } else {
                AlignmentStatus::NotDropped
            },
            score: out.score,
            max_query: out.end_v - 1,
            max_target: out.end_h - 1,
            cigar: out.cigar,
        }
    }

    fn name(&self) -> &'static str {
        "wfa"
    }
}
