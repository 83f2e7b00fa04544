pub mod karlin;

pub use karlin::{GapScoring, KarlinParams, KarlinScoring, ScoringModel};
