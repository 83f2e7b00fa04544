//! Co-linear chaining recurrence over one target's anchors.
//!
//! Anchors must be sorted by `(target_end, query_end)`. For every anchor `i`
//! the best predecessor `j < i` maximises `best_score[j] + gain(i, j)`, where
//! the gain is the new matched length capped by the anchor span, minus a
//! penalty that grows with the drift off the diagonal.
//!
//! ```text
//! window:  [start ......................... i)
//!           │                               │
//!           └─ target_end + max_dist_y ≥ target_start(i), at most max_iterations back
//!
//! scan j = i-1 down to start, stop after max_skip already-chained candidates
//! then try one long jump to the best-scoring anchor left of the scan
//! ```

use super::score_table::AnchorScoreTable;
use crate::core::utils::fast_math::log2_approx;
use crate::pipelines::linear::seeding::Anchor;
use crate::search_opt::ChainingParameters;

/// Gain of appending `later` to a chain ending at `earlier`, or `None` if the
/// two anchors cannot be chained.
#[inline]
pub fn compute_score(later: &Anchor, earlier: &Anchor, params: &ChainingParameters) -> Option<i32> {
    let dq_start = later.query_start() - earlier.query_end;
    let dq = later.query_end - earlier.query_end;
    if dq < 1 || dq_start > params.max_dist_x {
        return None;
    }

    let dt_start = later.target_start() - earlier.target_end;
    let dt = later.target_end - earlier.target_end;
    if dt == 0 || dt_start > params.max_dist_y {
        return None;
    }

    let drift = (dt - dq).abs();
    if drift > params.band_width {
        return None;
    }

    let skip = dt_start.abs().min(dq_start.abs());
    let mut score = later.span.min(dt.min(dq));
    if drift > 0 {
        let linear = params.chain_pen_gap * drift as f32 + params.chain_pen_skip * skip as f32;
        let log = 0.5 * log2_approx((drift + 1) as f32);
        score -= (linear + log) as i32;
    }
    Some(score)
}

/// Fill `table` for `anchors`. The table is reset to `anchors.len()` first.
pub fn fill_score_table(params: &ChainingParameters, anchors: &[Anchor], table: &mut AnchorScoreTable) {
    let n = anchors.len();
    table.reset(n);

    let max_dist = params.max_dist_y as i64;
    let max_iterations = params.max_iterations as i64;
    let mut max_index: i64 = -1;
    let mut start: usize = 0;

    for i in 0..n {
        let current = &anchors[i];
        let mut best = current.span;
        let mut pred: i64 = -1;
        let mut n_skip = 0;

        // Anchors are sorted on target_end, so the window start only moves right
        while start < i && (current.target_start() as i64) > anchors[start].target_end as i64 + max_dist {
            start += 1;
        }
        let window_start = (start as i64).max(i as i64 - max_iterations);

        let mut j = i as i64 - 1;
        while j >= window_start {
            let ju = j as usize;
            if let Some(gain) = compute_score(current, &anchors[ju], params) {
                let candidate = gain + table.best_score[ju];
                if candidate > best {
                    best = candidate;
                    pred = j;
                    if n_skip > 0 {
                        n_skip -= 1;
                    }
                } else if table.pre_predecessor[ju] == i as i64 {
                    n_skip += 1;
                    if n_skip > params.max_skip {
                        break;
                    }
                }
                let p = table.predecessor[ju];
                if p > -1 {
                    table.pre_predecessor[p as usize] = i as i64;
                }
            }
            j -= 1;
        }
        let scan_end = j;

        // Long jump: reconsider the best anchor in range if the scan stopped early
        if max_index < 0 || current.target_start() as i64 - anchors[max_index as usize].target_end as i64 > max_dist {
            max_index = -1;
            let mut max = i32::MIN;
            let mut k = i as i64 - 1;
            while k >= window_start {
                if table.best_score[k as usize] > max {
                    max = table.best_score[k as usize];
                    max_index = k;
                }
                k -= 1;
            }
        }
        if max_index >= 0 && max_index < scan_end {
            let m = max_index as usize;
            if let Some(gain) = compute_score(current, &anchors[m], params) {
                if gain + table.best_score[m] > best {
                    best = gain + table.best_score[m];
                    pred = max_index;
                }
            }
        }

        table.best_score[i] = best;
        table.predecessor[i] = pred;
        table.peak_score[i] = if pred > -1 {
            table.peak_score[pred as usize].max(best)
        } else {
            best
        };
        if max_index < 0 || table.best_score[max_index as usize] < best {
            max_index = i as i64;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ChainingParameters {
        ChainingParameters::default()
    }

    #[test]
    fn test_on_diagonal_gain_is_span() {
        let a = Anchor::from_start(0, 100, 20, 0);
        let b = Anchor::from_start(50, 150, 20, 0);
        assert_eq!(compute_score(&b, &a, &params()), Some(20));
    }

    #[test]
    fn test_overlapping_anchor_gain_is_advance() {
        let a = Anchor::from_start(0, 0, 20, 0);
        let b = Anchor::from_start(10, 10, 20, 0);
        assert_eq!(compute_score(&b, &a, &params()), Some(10));
    }

    #[test]
    fn test_drift_penalty() {
        let a = Anchor::from_start(0, 0, 20, 0);
        // dq = 30, dt = 40, drift 10: 0.12*10 + 0.5*log2(11) = 1.2 + 1.73
        let b = Anchor::new(50, 60, 20, 0);
        assert_eq!(compute_score(&b, &a, &params()), Some(20 - 2));
    }

    #[test]
    fn test_rejections() {
        let p = params();
        let a = Anchor::from_start(100, 100, 20, 0);
        // Query does not advance
        assert_eq!(compute_score(&Anchor::from_start(90, 200, 30, 0), &a, &p), None);
        // Same target end
        assert_eq!(compute_score(&Anchor::from_start(150, 90, 30, 0), &a, &p), None);
        // Too far on the query
        assert_eq!(compute_score(&Anchor::from_start(1200, 1200, 20, 0), &a, &p), None);
        // Drift beyond band_width
        assert_eq!(compute_score(&Anchor::from_start(200, 600, 20, 0), &a, &p), None);
    }

    #[test]
    fn test_single_anchor_scores_span() {
        let mut table = AnchorScoreTable::default();
        fill_score_table(&params(), &[Anchor::from_start(5, 5, 33, 0)], &mut table);
        assert_eq!(table.best_score, vec![33]);
        assert_eq!(table.predecessor, vec![-1]);
        assert_eq!(table.peak_score, vec![33]);
    }

    #[test]
    fn test_collinear_anchors_chain() {
        let anchors: Vec<Anchor> = (0..5).map(|k| Anchor::from_start(k * 40, 1000 + k * 40, 20, 0)).collect();
        let mut table = AnchorScoreTable::default();
        fill_score_table(&params(), &anchors, &mut table);
        assert_eq!(table.best_score, vec![20, 40, 60, 80, 100]);
        assert_eq!(table.predecessor, vec![-1, 0, 1, 2, 3]);
        assert_eq!(table.peak_score[4], 100);
    }

    #[test]
    fn test_distant_anchors_do_not_chain() {
        let anchors = vec![Anchor::from_start(0, 0, 20, 0), Anchor::from_start(30, 5000, 20, 0)];
        let mut table = AnchorScoreTable::default();
        fill_score_table(&params(), &anchors, &mut table);
        assert_eq!(table.predecessor, vec![-1, -1]);
        assert_eq!(table.best_score, vec![20, 20]);
    }
}
