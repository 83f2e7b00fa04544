//! Per-worker workspace for reusable allocations
//!
//! Every rayon worker owns exactly one `SearchWorkspace`, created by the
//! orchestrator through `map_init` and passed down explicitly. Nothing here is
//! shared between threads. It carries:
//!
//! - both aligner kernels with their DP buffers
//! - the chaining score table, reset per target instead of reallocated
//! - a local phase timer, merged into the run total after each query

use super::aligner::AlignerKind;
use super::banded_swa::BandedSwaAligner;
use super::wavefront::WavefrontAligner;
use crate::core::stats::GapScoring;
use crate::core::utils::timer::ExtensionTimer;
use crate::pipelines::linear::chaining::AnchorScoreTable;

/// Expected number of anchors per target group for pre-allocation
const INITIAL_ANCHOR_CAPACITY: usize = 1024;

pub struct SearchWorkspace {
    pub kind: AlignerKind,
    pub banded: BandedSwaAligner,
    pub wavefront: WavefrontAligner,
    pub score_table: AnchorScoreTable,
    pub timer: ExtensionTimer,
}

impl SearchWorkspace {
    pub fn new(kind: AlignerKind, scoring: GapScoring) -> Self {
        Self {
            kind,
            banded: BandedSwaAligner::new(scoring),
            wavefront: WavefrontAligner::new(scoring),
            score_table: AnchorScoreTable::with_capacity(INITIAL_ANCHOR_CAPACITY),
            timer: ExtensionTimer::new(),
        }
    }
}
