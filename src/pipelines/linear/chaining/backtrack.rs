use std::cmp::Reverse;

use super::score_table::AnchorScoreTable;
use super::types::Chain;
use crate::pipelines::linear::seeding::Anchor;

/// Walk predecessors from `end` and return the exclusive chain start.
///
/// The returned index is the anchor whose prefix score, subtracted from
/// `end_score`, leaves the largest chain score; `-1` means the chain runs
/// to the first anchor. The walk stops at an anchor already claimed by
/// another chain, or once the score has dropped more than `max_drop`
/// below the best seen.
pub fn find_chain_start(table: &AnchorScoreTable, max_drop: i32, end_score: i32, end: i64) -> i64 {
    if end < 0 || table.used[end as usize] {
        return end;
    }

    let mut index = end;
    let mut best_index = end;
    let mut best_diff = 0;
    loop {
        index = table.predecessor[index as usize];
        let diff = if index < 0 {
            end_score
        } else {
            end_score - table.best_score[index as usize]
        };
        if diff > best_diff {
            best_diff = diff;
            best_index = index;
        } else if best_diff - diff > max_drop {
            break;
        }
        if index < 0 || table.used[index as usize] {
            break;
        }
    }
    best_index
}

/// Extract disjoint chains from a filled score table.
///
/// Candidate ends are anchors with `best_score >= min_chain_score`, visited
/// from highest score down (ties broken by higher index). With
/// `max_chain_ends`, only that many top candidates are considered. Chains
/// are returned in discovery order.
pub fn backtrack_chains(
    table: &mut AnchorScoreTable,
    anchors: &[Anchor],
    min_chain_score: i32,
    max_drop: i32,
    is_reverse: bool,
    max_chain_ends: Option<usize>,
) -> Vec<Chain> {
    let mut ends: Vec<(i32, usize)> = table
        .best_score
        .iter()
        .enumerate()
        .filter(|(_, &s)| s >= min_chain_score)
        .map(|(i, &s)| (s, i))
        .collect();
    if ends.is_empty() {
        return Vec::new();
    }

    ends.sort_unstable_by_key(|&e| Reverse(e));
    if let Some(limit) = max_chain_ends {
        ends.truncate(limit);
    }

    table.clear_used();
    let mut chains = Vec::new();
    for &(end_score, end) in &ends {
        if table.used[end] {
            continue;
        }
        let start = find_chain_start(table, max_drop, end_score, end as i64);

        let mut chain = Chain::new(is_reverse);
        let mut idx = end as i64;
        while idx != start {
            let u = idx as usize;
            table.used[u] = true;
            chain.anchors.push(anchors[u]);
            idx = table.predecessor[u];
        }

        let score = if start < 0 {
            end_score
        } else {
            end_score - table.best_score[start as usize]
        };
        if score >= min_chain_score && !chain.anchors.is_empty() {
            chain.target_id = anchors[end].target_id;
            chain.score = score;
            chains.push(chain);
        }
    }

    log::trace!(
        "Backtracked {} chains from {} candidate ends over {} anchors",
        chains.len(),
        ends.len(),
        anchors.len()
    );
    chains
}
