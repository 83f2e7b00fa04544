//! Alignment of chains into gapped HSPs.
//!
//! ## Module Organization
//!
//! - `cigar` - [`ExtensionCigar`], the edit script with peak bookkeeping
//! - `extension` - anchor stitching, left/right extension and restart-at-peak

mod cigar;
mod extension;

pub use cigar::ExtensionCigar;
pub use extension::{
    extend_between_anchors, extend_chains, extend_new_at_peak, ExtensionContext, SegmentExtension,
};
