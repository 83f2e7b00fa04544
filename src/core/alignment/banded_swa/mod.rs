//! Banded affine-gap dynamic programming with z-drop.

pub mod scalar;
pub mod types;

pub use scalar::*;
pub use types::*;

use super::aligner::Aligner;
use super::types::{AlignMode, AlignResult};
use crate::core::stats::GapScoring;

/// [`Aligner`] backed by the scalar banded kernel.
#[derive(Debug, Clone)]
pub struct BandedSwaAligner {
    sw: BandedPairWiseSW,
}

impl BandedSwaAligner {
    pub fn new(scoring: GapScoring) -> Self {
        Self {
            sw: BandedPairWiseSW::new(scoring),
        }
    }
}

impl Aligner for BandedSwaAligner {
    fn align(
        &mut self,
        target: &[u8],
        query: &[u8],
        mode: AlignMode,
        band: i32,
        zdrop: i32,
    ) -> AlignResult {
        scalar_banded_directional(&mut self.sw, mode, target, query, band, zdrop)
    }

    fn name(&self) -> &'static str {
        "banded-swa"
    }
}
