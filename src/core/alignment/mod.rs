//! Core alignment kernels.
//!
//! These modules know nothing about chains or targets. They align two coded
//! windows in one of three modes and report an edit script, a score and how
//! far the alignment reached.

pub mod aligner;
pub mod banded_swa;
pub mod types;
pub mod wavefront;
pub mod workspace; // Per-worker buffers and timers

pub use aligner::{Aligner, AlignerKind, AlignerLimits};
pub use types::{AlignMode, AlignResult, AlignmentStatus, CigarOp};
