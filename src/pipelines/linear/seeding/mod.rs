//! Seed lookup and anchor construction.
//!
//! ```text
//! query ─► SeedLookup ─► Vec<SeedHit> ─► extend_seed_hits ─► Vec<Anchor>
//!                                                     └─► group_anchors_by_target
//! ```

pub mod anchor;
pub mod grouping;
pub mod lookup;
pub mod ungapped;

pub use anchor::{Anchor, SeedHit};
pub use grouping::{group_anchors_by_target, AnchorGroup};
pub use lookup::{KmerIndex, SeedLookup};
pub use ungapped::extend_seed_hits;
