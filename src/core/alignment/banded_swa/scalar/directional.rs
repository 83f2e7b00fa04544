use crate::core::alignment::banded_swa::scalar::implementation::scalar_banded_extz;
use crate::core::alignment::banded_swa::types::{BandedPairWiseSW, NEG_INF};
use crate::core::alignment::types::{AlignMode, AlignResult, AlignmentStatus};

/// Run the banded kernel in one of the three extender modes.
///
/// * `Left`: both windows are reversed, extended from their (reversed)
///   start, and the cigar is flipped back to forward orientation.
///   `max_query`/`max_target` stay in the reversed frame, i.e. they count
///   bases consumed leftwards minus one.
/// * `Right`: extension from the window start with a free end point.
/// * `Global`: end-to-end. A run that z-drops or never reaches the corner
///   reports `Dropped` with its peak score and the path to the peak.
pub fn scalar_banded_directional(
    sw: &mut BandedPairWiseSW,
    mode: AlignMode,
    target: &[u8],
    query: &[u8],
    band: i32,
    zdrop: i32,
) -> AlignResult {
    if query.is_empty() || target.is_empty() {
        return align_empty(sw, mode, target.len(), query.len());
    }

    let ez = if mode == AlignMode::Left {
        let q: Vec<u8> = query.iter().rev().copied().collect();
        let t: Vec<u8> = target.iter().rev().copied().collect();
        let mut ez = scalar_banded_extz(sw, &q, &t, band, zdrop, true);
        ez.cigar.reverse();
        ez
    } else {
        scalar_banded_extz(sw, query, target, band, zdrop, mode == AlignMode::Right)
    };

    match mode {
        AlignMode::Global if !ez.zdropped && ez.score > NEG_INF => AlignResult {
            status: AlignmentStatus::NotDropped,
            cigar: ez.cigar,
            score: ez.score,
            max_query: query.len() as i32 - 1,
            max_target: target.len() as i32 - 1,
        },
        _ => AlignResult {
            status: if ez.zdropped || mode == AlignMode::Global {
                AlignmentStatus::Dropped
            } else {
                AlignmentStatus::NotDropped
            },
            cigar: ez.cigar,
            score: ez.max,
            max_query: ez.max_q,
            max_target: ez.max_t,
        },
    }
}

/// One side empty: extensions align nothing, a global alignment is a single gap.
fn align_empty(sw: &BandedPairWiseSW, mode: AlignMode, tlen: usize, qlen: usize) -> AlignResult {
    if mode != AlignMode::Global || (tlen == 0 && qlen == 0) {
        return AlignResult::empty();
    }
    let (op, len) = if qlen == 0 { (b'D', tlen) } else { (b'I', qlen) };
    AlignResult {
        status: AlignmentStatus::NotDropped,
        cigar: vec![(op, len as u32)],
        score: -(sw.gap_open() + sw.gap_extend() * len as i32),
        max_query: qlen as i32 - 1,
        max_target: tlen as i32 - 1,
    }
}
