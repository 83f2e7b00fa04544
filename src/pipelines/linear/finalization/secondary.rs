//! Primary/secondary chain classification and mapping quality.

use crate::pipelines::linear::chaining::Chain;

/// Sort `chains` by descending score, mark primaries and set their MAPQ.
///
/// The best chain is always primary. A later chain is secondary to every
/// primary whose query interval it overlaps by at least `min_overlap` of the
/// shorter span; otherwise it becomes primary itself. Each primary's MAPQ is
/// computed against the best score among its secondaries.
pub fn detect_primary_chains(chains: &mut [Chain], min_overlap: f64) {
    if chains.is_empty() {
        return;
    }
    chains.sort_by(|a, b| b.score.cmp(&a.score));

    let spans: Vec<i32> = chains.iter().map(|c| c.query_span()).collect();
    let mut best_secondary = vec![0i32; chains.len()];
    let mut primaries: Vec<usize> = vec![0];

    for c in chains.iter_mut() {
        c.is_primary = false;
    }
    chains[0].is_primary = true;

    for i in 1..chains.len() {
        let mut is_primary = true;
        for &p in &primaries {
            let overlap = chains[i].overlap_in_query(&chains[p]);
            if overlap < 1 {
                continue;
            }
            let fraction = overlap as f64 / spans[i].min(spans[p]) as f64;
            if fraction >= min_overlap {
                is_primary = false;
                best_secondary[p] = best_secondary[p].max(chains[i].score);
            }
        }
        if is_primary {
            chains[i].is_primary = true;
            primaries.push(i);
        }
    }

    for &p in &primaries {
        chains[p].compute_mapping_quality(best_secondary[p]);
    }

    log::trace!("{} of {} chains are primary", primaries.len(), chains.len());
}
