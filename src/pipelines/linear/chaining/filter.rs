use super::types::Chain;

/// Keep chains that score within `cutoff` of the best chain on their target.
///
/// Output is ordered by target id, then by descending score. Every target
/// keeps at least its best chain.
pub fn only_keep_best_chains_per_target(chains: &mut Vec<Chain>, cutoff: f64) {
    if chains.is_empty() {
        return;
    }
    chains.sort_by(|a, b| a.target_id.cmp(&b.target_id).then(b.score.cmp(&a.score)));

    let mut current_target = chains[0].target_id;
    let mut threshold = (cutoff * chains[0].score as f64) as i32;
    for (i, chain) in chains.iter_mut().enumerate() {
        if i == 0 || chain.target_id != current_target {
            current_target = chain.target_id;
            threshold = (cutoff * chain.score as f64) as i32;
            chain.is_primary = true;
        } else {
            chain.is_primary = chain.score >= threshold;
        }
    }
    let before = chains.len();
    chains.retain(|c| c.is_primary);
    log::trace!("Per-target cutoff kept {}/{} chains", chains.len(), before);
}

/// Drop chains scoring below `fraction` of the best chain.
///
/// `chains` must be sorted by descending score.
pub fn filter_by_fraction_of_best(chains: &mut Vec<Chain>, fraction: f64) {
    let Some(best) = chains.first() else {
        return;
    };
    let threshold = (best.score as f64 * fraction) as i32;
    let keep = chains.partition_point(|c| c.score >= threshold);
    chains.truncate(keep);
}
