// src/defaults.rs

// Scoring Constants
pub const REWARD: i32 = 2;
pub const PENALTY: i32 = 3;
pub const GAP_OPEN: i32 = 5;
pub const GAP_EXTEND: i32 = 2;

// Seeding Constants
pub const KMER_SIZE: usize = 15;
pub const MAX_KMER_OCCURRENCES: usize = 1000;

// Chaining Constants
pub const MAX_DIST_X: i32 = 1000;
pub const MAX_DIST_Y: i32 = 1000;
pub const CHAIN_BAND_WIDTH: i32 = 300;
pub const MAX_SKIP: i32 = 25;
pub const MAX_ITERATIONS: i32 = 3000;
pub const CHAIN_PEN_GAP: f32 = 0.12;
pub const CHAIN_PEN_SKIP: f32 = 0.0;
pub const MIN_CHAIN_SCORE: i32 = 40;
pub const MAP_PERCENTAGE_TARGET: f64 = 0.99;
pub const MIN_OVERLAP_PERCENTAGE_SECONDARY: f64 = 0.5;
pub const MAX_OVERLAP_EXTENSION: f32 = 0.8;
pub const CHAIN_FRACTION_ALIGN: f64 = 0.0;

/// Candidate chain ends kept per target when only the best HSP is reported
pub const BEST_HSP_CHAIN_ENDS: usize = 4;

// Output Constants
pub const MAX_EVALUE: f64 = 0.001;
pub const VERBOSITY: u8 = 3;
