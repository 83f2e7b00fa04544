//! Anchor chaining.
//!
//! Chaining runs once per target group of anchors sorted by
//! `(target_end, query_end)`:
//!
//! 1. [`fill_score_table`] scores every anchor as the end of its best
//!    co-linear chain (`dp`).
//! 2. [`backtrack_chains`] peels disjoint chains off the table, best end
//!    first, trimming each chain where its score drops away (`backtrack`).
//! 3. The query-level filters in `filter` prune chains across targets.
//!
//! # Module Organization
//!
//! - `types` - [`Chain`]
//! - `score_table` - [`AnchorScoreTable`], reused per worker
//! - `dp` - gain function and recurrence
//! - `backtrack` - chain extraction
//! - `filter` - score cutoffs

mod backtrack;
mod dp;
mod filter;
mod score_table;
mod types;

pub use backtrack::{backtrack_chains, find_chain_start};
pub use dp::{compute_score, fill_score_table};
pub use filter::{filter_by_fraction_of_best, only_keep_best_chains_per_target};
pub use score_table::AnchorScoreTable;
pub use types::Chain;

use crate::pipelines::linear::seeding::Anchor;
use crate::search_opt::ChainingParameters;

/// Chain one target's anchors.
///
/// `anchors` must belong to a single target and be sorted by
/// `(target_end, query_end)`.
pub fn chain_anchors(
    params: &ChainingParameters,
    anchors: &[Anchor],
    table: &mut AnchorScoreTable,
    is_reverse: bool,
    max_chain_ends: Option<usize>,
) -> Vec<Chain> {
    if anchors.is_empty() {
        return Vec::new();
    }
    fill_score_table(params, anchors, table);
    backtrack_chains(
        table,
        anchors,
        params.min_chain_score,
        params.band_width,
        is_reverse,
        max_chain_ends,
    )
}
