//! Pluggable pairwise aligners used by the chain extender.
//!
//! The extender never knows which kernel it drives. It hands an
//! [`Aligner`] a target window, a query window, a mode, a band and a drop
//! threshold, and interprets the returned [`AlignResult`]. The concrete
//! kernel is chosen once per query through [`AlignerKind`].

use super::types::{AlignMode, AlignResult};

pub trait Aligner {
    /// Align `query` against `target`.
    ///
    /// `band` bounds the diagonal drift; `zdrop` is the early-termination
    /// threshold. In [`AlignMode::Left`] both windows are aligned reversed and
    /// the cigar comes back in forward orientation.
    fn align(
        &mut self,
        target: &[u8],
        query: &[u8],
        mode: AlignMode,
        band: i32,
        zdrop: i32,
    ) -> AlignResult;

    fn name(&self) -> &'static str;
}

/// Band and drop limits an aligner kind runs with by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignerLimits {
    pub band_extension: i32,
    pub zdrop_extension: i32,
    pub band_global: i32,
    pub zdrop_global: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignerKind {
    #[default]
    BandedSwa,
    Wavefront,
}

impl AlignerKind {
    pub fn default_limits(self) -> AlignerLimits {
        match self {
            AlignerKind::BandedSwa => AlignerLimits {
                band_extension: 40,
                zdrop_extension: 40,
                band_global: 30,
                zdrop_global: 100,
            },
            AlignerKind::Wavefront => AlignerLimits {
                band_extension: 20,
                zdrop_extension: 100,
                band_global: 30,
                zdrop_global: 500,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AlignerKind::BandedSwa => "banded-swa",
            AlignerKind::Wavefront => "wfa",
        }
    }

    /// Parse a CLI value. Accepts `banded`, `banded-swa`, `ksw`, `wfa` and `wavefront`.
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_ascii_lowercase().as_str() {
            "banded" | "banded-swa" | "ksw" | "ksw2" => Ok(AlignerKind::BandedSwa),
            "wfa" | "wavefront" => Ok(AlignerKind::Wavefront),
            other => Err(format!("Unknown aligner '{}' (expected banded-swa or wfa)", other)),
        }
    }
}
