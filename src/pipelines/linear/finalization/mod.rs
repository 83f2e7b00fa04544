//! Result assembly.
//!
//! ## Module Organization
//!
//! - `secondary` - primary/secondary classification and MAPQ
//! - `hsp` - [`Hsp`], [`Match`] and their construction from edit scripts or chains

mod hsp;
mod secondary;

pub use hsp::{
    build_hsp_from_cigar, build_map_hsps, compute_residue_matches, EditOp, Hsp, Interval, Match,
    Strand,
};
pub use secondary::detect_primary_chains;
