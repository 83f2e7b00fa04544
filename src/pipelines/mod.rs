//! Search pipelines.
//!
//! - `linear`: seed, chain and extend against a flat collection of targets

pub mod linear;
