//! Chain-to-alignment extension.
//!
//! A chain is turned into one or more HSPs by walking its anchors from the
//! earliest (`anchors.last()`) to the latest (`anchors[0]`):
//!
//! ```text
//!   left ext      anchor k     gap      anchor k-1          anchor 0    right ext
//! ◄──────────── [=========] ~~~~~~~~~ [=========] ... [=========] ────────────►
//!   AlignMode::Left          Global or                           AlignMode::Right
//!                            gap run + matches
//! ```
//!
//! The score is tracked as the script grows and its maximum is remembered
//! after every anchor. If a gap alignment drops, or the finished alignment
//! scores below that maximum, the script is cut back to the peak, extended
//! rightwards from there and reported; the walk then resumes from the next
//! anchor as a fresh alignment.

use super::cigar::ExtensionCigar;
use crate::core::alignment::{AlignMode, Aligner, AlignmentStatus, CigarOp};
use crate::core::error::AlignError;
use crate::core::stats::{GapScoring, ScoringModel};
use crate::pipelines::linear::chaining::Chain;
use crate::pipelines::linear::finalization::{build_hsp_from_cigar, Hsp, Interval};
use crate::search_opt::ExtensionParams;

/// Shared, read-only inputs of one extension run.
#[derive(Clone, Copy)]
pub struct ExtensionContext<'a> {
    pub params: &'a ExtensionParams,
    pub gap: GapScoring,
    pub scoring: &'a dyn ScoringModel,
}

impl<'a> ExtensionContext<'a> {
    pub fn new(params: &'a ExtensionParams, scoring: &'a dyn ScoringModel) -> Self {
        Self {
            params,
            gap: GapScoring::from_model(scoring),
            scoring,
        }
    }
}

/// One HSP and the anchor index the next walk starts from (`-1`: done).
#[derive(Debug, Clone)]
pub struct SegmentExtension {
    pub hsp: Hsp,
    pub next_anchor_index: i64,
}

/// Right-extension target window end for an alignment ending at `j_end`.
#[inline]
fn right_window_end(j_end: usize, query_rest: usize, target_len: usize, band: i32) -> usize {
    let band = band.max(0) as usize;
    target_len.min((j_end + band + query_rest).min(j_end + 2 * query_rest))
}

fn extend_right<A: Aligner>(
    aligner: &mut A,
    ctx: &ExtensionContext<'_>,
    cigar: &mut ExtensionCigar,
    query: &[u8],
    target: &[u8],
    i_end: usize,
    j_end: usize,
) -> Result<AlignmentStatus, AlignError> {
    let query_right = &query[i_end..];
    let t_end = right_window_end(j_end, query_right.len(), target.len(), ctx.params.band_extension);
    let target_right = &target[j_end..t_end.max(j_end)];

    let result = aligner.align(
        target_right,
        query_right,
        AlignMode::Right,
        ctx.params.band_extension,
        ctx.params.zdrop_extension,
    );
    cigar.apply(&result, AlignMode::Right)
}

/// Cut the script back to its peak, extend rightwards from the peak anchor
/// and report the result. `next_anchor_index` is passed through.
#[allow(clippy::too_many_arguments)]
pub fn extend_new_at_peak<A: Aligner>(
    aligner: &mut A,
    ctx: &ExtensionContext<'_>,
    mut cigar: ExtensionCigar,
    chain: &Chain,
    query: &[u8],
    target: &[u8],
    start: (i32, i32),
    next_anchor_index: i64,
) -> Result<SegmentExtension, AlignError> {
    cigar.truncate_to_peak();
    let peak_anchor = &chain.anchors[cigar.peak_anchor_index];
    log::trace!(
        "Restarting at peak score {} (anchor {}), resuming at {}",
        cigar.peak_score,
        cigar.peak_anchor_index,
        next_anchor_index
    );

    extend_right(
        aligner,
        ctx,
        &mut cigar,
        query,
        target,
        peak_anchor.query_end as usize,
        peak_anchor.target_end as usize,
    )?;

    let hsp = build_hsp_from_cigar(&cigar, start.0, start.1, query, target, chain.is_reverse, ctx.scoring);
    Ok(SegmentExtension {
        hsp,
        next_anchor_index,
    })
}

/// Extend one walk of `chain`, starting at `anchor_idx` and moving towards
/// `anchors[0]`.
///
/// `query` must be the strand the chain was built on.
pub fn extend_between_anchors<A: Aligner>(
    aligner: &mut A,
    ctx: &ExtensionContext<'_>,
    chain: &Chain,
    query: &[u8],
    target: &[u8],
    anchor_idx: usize,
) -> Result<SegmentExtension, AlignError> {
    let anchors = &chain.anchors;
    let params = ctx.params;
    let reward = ctx.gap.reward;

    let start_i = anchors[anchor_idx].query_start();
    let start_j = anchors[anchor_idx].target_start();
    let start = (start_i, start_j);

    let mut cigar = ExtensionCigar::with_capacity(anchor_idx * 3 + 2);

    // ===== Left extension =====
    if start_i > 0 && start_j > 0 {
        let (mut prev_i, mut prev_j) = (0, 0);
        if anchor_idx + 1 < anchors.len() {
            let prev = &anchors[anchor_idx + 1];
            if prev.query_end <= start_i && prev.target_end <= start_j {
                prev_i = prev.query_end;
                prev_j = prev.target_end;
            }
        }

        let query_left = &query[prev_i as usize..start_i as usize];
        let qlen = query_left.len() as i32;
        let t_begin = prev_j.max((start_j - qlen - params.band_extension).max(start_j - 2 * qlen));
        let target_left = &target[t_begin as usize..start_j as usize];

        let result = aligner.align(
            target_left,
            query_left,
            AlignMode::Left,
            params.band_extension,
            params.zdrop_extension,
        );
        cigar.apply(&result, AlignMode::Left)?;
    }

    // ===== Stitch anchors =====
    let mut dq = i32::MAX;
    let mut dt = i32::MAX;
    let mut k = anchor_idx;
    while k > 0 {
        let current = &anchors[k];
        let next = &anchors[k - 1];

        if dq > current.span && dt > current.span {
            cigar.push(current.span as u32, CigarOp::AlignmentMatch);
            cigar.score += current.span * reward;
        }
        cigar.record_peak(k);

        dq = next.query_end - current.query_end;
        dt = next.target_end - current.target_end;
        if dq < 1 || dt < 1 {
            return Err(unmatched(k, dq, dt));
        }

        if dq > next.span && dt > next.span {
            // Case 1: a real gap on both sequences
            let query_gap = &query[current.query_end as usize..next.query_start() as usize];
            let target_gap = &target[current.target_end as usize..next.target_start() as usize];
            let (ql, tl) = (query_gap.len() as i32, target_gap.len() as i32);
            let band = (ql - tl).abs() + params.band_global.min(ql.min(tl) / 2);

            let result = aligner.align(target_gap, query_gap, AlignMode::Global, band, params.zdrop_global);
            let status = cigar.apply(&result, AlignMode::Global)?;
            if status != AlignmentStatus::NotDropped {
                let next_index = k as i64 - 1;
                if status == AlignmentStatus::Dropped && cigar.score >= cigar.peak_score {
                    let hsp = build_hsp_from_cigar(&cigar, start_i, start_j, query, target, chain.is_reverse, ctx.scoring);
                    return Ok(SegmentExtension {
                        hsp,
                        next_anchor_index: next_index,
                    });
                }
                return extend_new_at_peak(aligner, ctx, cigar, chain, query, target, start, next_index);
            }
        } else if dq <= next.span && dq < dt {
            // Case 2: more overlap on the query, target gap
            let gaps = dt - dq;
            cigar.push(gaps as u32, CigarOp::Deletion);
            cigar.score -= ctx.gap.gap_cost(gaps);
            cigar.push(dq as u32, CigarOp::AlignmentMatch);
            cigar.score += dq * reward;
        } else if dt <= next.span && dt < dq {
            // Case 3: more overlap on the target, query gap
            let gaps = dq - dt;
            cigar.push(gaps as u32, CigarOp::Insertion);
            cigar.score -= ctx.gap.gap_cost(gaps);
            cigar.push(dt as u32, CigarOp::AlignmentMatch);
            cigar.score += dt * reward;
        } else if dq == dt && dq <= next.span {
            // Case 4: same diagonal, overlapping anchors
            cigar.push(dq as u32, CigarOp::AlignmentMatch);
            cigar.score += dq * reward;
        } else {
            return Err(unmatched(k, dq, dt));
        }
        k -= 1;
    }

    let last = &anchors[0];
    if dq > last.span && dt > last.span {
        cigar.push(last.span as u32, CigarOp::AlignmentMatch);
        cigar.score += last.span * reward;
    }

    // ===== Right extension =====
    extend_right(
        aligner,
        ctx,
        &mut cigar,
        query,
        target,
        last.query_end as usize,
        last.target_end as usize,
    )?;

    if cigar.score >= cigar.peak_score {
        let hsp = build_hsp_from_cigar(&cigar, start_i, start_j, query, target, chain.is_reverse, ctx.scoring);
        Ok(SegmentExtension {
            hsp,
            next_anchor_index: -1,
        })
    } else {
        extend_new_at_peak(aligner, ctx, cigar, chain, query, target, start, -1)
    }
}

fn unmatched(anchor_index: usize, dq: i32, dt: i32) -> AlignError {
    AlignError::UnmatchedAnchorOverlap {
        anchor_index,
        query_distance: dq as i64,
        target_distance: dt as i64,
    }
}

/// Chain span in forward-query coordinates, plus its target span.
fn chain_ranges(chain: &Chain, query_len: i32) -> (Interval, Interval) {
    let (qs, qe) = (chain.query_start(), chain.query_end());
    let query = if chain.is_reverse {
        Interval::new(query_len - qe, query_len - qs)
    } else {
        Interval::new(qs, qe)
    };
    (query, Interval::new(chain.target_start(), chain.target_end()))
}

/// Extend all chains of one target into HSPs.
///
/// `chains` must be sorted by descending score. A chain is skipped when both
/// its query and target spans overlap an already reported HSP by more than
/// `max_overlap_extension` of the chain's own spans. Only HSPs with
/// `evalue < max_evalue` are kept; with `best_hsp_only` just the best one.
#[allow(clippy::too_many_arguments)]
pub fn extend_chains<A: Aligner>(
    aligner: &mut A,
    ctx: &ExtensionContext<'_>,
    max_overlap_extension: f32,
    chains: &[Chain],
    query: &[u8],
    query_rc: &[u8],
    target: &[u8],
) -> Result<Vec<Hsp>, AlignError> {
    let query_len = query.len() as i32;
    let mut hsps: Vec<Hsp> = Vec::new();
    let mut extended: Vec<(Interval, Interval)> = Vec::new();

    for chain in chains.iter().filter(|c| !c.anchors.is_empty()) {
        let (q_range, t_range) = chain_ranges(chain, query_len);
        let q_limit = (max_overlap_extension * q_range.len() as f32) as i32;
        let t_limit = (max_overlap_extension * t_range.len() as f32) as i32;
        let covered = extended
            .iter()
            .any(|(q, t)| q_range.overlap(q) > q_limit && t_range.overlap(t) > t_limit);
        if covered {
            log::trace!("Skipping chain with score {}: already covered", chain.score);
            continue;
        }

        let strand = if chain.is_reverse { query_rc } else { query };
        let mut anchor_idx = chain.anchors.len() as i64 - 1;
        while anchor_idx > -1 {
            let segment = extend_between_anchors(aligner, ctx, chain, strand, target, anchor_idx as usize)?;
            if segment.hsp.evalue < ctx.params.max_evalue {
                extended.push((segment.hsp.query_range, segment.hsp.subject_range));
                hsps.push(segment.hsp);
            }
            anchor_idx = segment.next_anchor_index;
        }
    }

    if ctx.params.best_hsp_only && hsps.len() > 1 {
        let mut best = 0;
        for (i, h) in hsps.iter().enumerate() {
            if h.score > hsps[best].score {
                best = i;
            }
        }
        let kept = hsps.swap_remove(best);
        hsps = vec![kept];
    }
    Ok(hsps)
}
