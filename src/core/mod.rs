//! Reusable building blocks: alignment kernels, sequence encoding,
//! statistics, IO and small utilities.

pub mod alignment;
pub mod compute;
pub mod error;
pub mod io;
pub mod sequence;
pub mod stats;
pub mod utils;
