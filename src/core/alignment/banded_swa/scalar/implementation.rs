use crate::core::alignment::banded_swa::types::{
    BandedPairWiseSW, EhT, ExtzResult, NEG_INF, TB_DEL, TB_DEL_CONT, TB_INS, TB_INS_CONT,
    TB_MATCH,
};
use crate::core::alignment::types::push_raw_op;
use crate::core::compute::encoding::{ALPHABET_SIZE, AMBIGUOUS_CODE};

/// Banded global/extension DP with z-drop (ksw2 `extz` semantics).
///
/// The path is anchored at `(0, 0)` with score 0. Cells with `|i - j| > w`
/// are never filled. After each target row the row maximum is checked
/// against the best score so far; the run stops once it falls more than
/// `zdrop + |Δt - Δq| * gap_extend` below it.
///
/// With `extension_only` the traceback always starts from the best cell.
/// Otherwise it starts from the bottom-right corner, unless the run
/// dropped or never reached the corner.
///
/// Both inputs must be non-empty and coded 0..=4.
pub fn scalar_banded_extz(
    sw: &mut BandedPairWiseSW,
    query: &[u8],
    target: &[u8],
    w: i32,
    zdrop: i32,
    extension_only: bool,
) -> ExtzResult {
    let mut ez = ExtzResult::default();
    let qlen = query.len() as i32;
    let tlen = target.len() as i32;
    if qlen == 0 || tlen == 0 {
        return ez;
    }

    let gapo = sw.gap_open();
    let gape = sw.gap_extend();
    let gapoe = gapo + gape;
    let mat = *sw.scoring_matrix();

    let w = if w < 0 { tlen.max(qlen) } else { w };
    let n_col = qlen.min(2 * w + 1) as usize;

    let BandedPairWiseSW {
        query_profile: qp,
        eh,
        traceback: z,
        row_offset: off,
        row_end,
        ..
    } = sw;

    // Query profile: one row of scores per target code
    qp.clear();
    qp.resize(qlen as usize * ALPHABET_SIZE, 0);
    for k in 0..ALPHABET_SIZE {
        let row = &mut qp[k * qlen as usize..(k + 1) * qlen as usize];
        for (slot, &base) in row.iter_mut().zip(query) {
            let code = base.min(AMBIGUOUS_CODE) as usize;
            *slot = mat[k * ALPHABET_SIZE + code];
        }
    }

    // First row
    eh.clear();
    eh.resize(qlen as usize + 1, EhT::default());
    eh[0].h = 0;
    eh[0].e = -gapoe - gapoe;
    for j in 1..=qlen {
        let cell = &mut eh[j as usize];
        if j <= w {
            cell.h = -(gapoe + gape * (j - 1));
            cell.e = -(gapoe + gapoe + gape * j);
        } else {
            cell.h = NEG_INF;
            cell.e = NEG_INF;
        }
    }

    z.clear();
    z.resize(n_col * tlen as usize, 0);
    off.clear();
    off.resize(tlen as usize, 0);
    row_end.clear();
    row_end.resize(tlen as usize, -1);

    let mut max_j = 0;
    let mut last_row = -1;

    for i in 0..tlen {
        let st = if i > w { i - w } else { 0 };
        let en = if i + w < qlen - 1 { i + w } else { qlen - 1 };
        if st > en {
            break;
        }

        let t_code = target[i as usize].min(AMBIGUOUS_CODE) as usize;
        let q = &qp[t_code * qlen as usize..(t_code + 1) * qlen as usize];
        let zi = &mut z[i as usize * n_col..(i as usize + 1) * n_col];
        off[i as usize] = st;
        row_end[i as usize] = en;

        let mut max = NEG_INF;
        let mut h1 = if st > 0 { NEG_INF } else { -(gapoe + gape * i) };
        let mut f = if st > 0 { NEG_INF } else { -(gapoe + gapoe + gape * i) };

        for j in st..=en {
            let p = &mut eh[j as usize];
            let mut h = p.h;
            let mut e = p.e;
            p.h = h1;

            h += q[j as usize] as i32;
            let mut d = if h >= e { TB_MATCH } else { TB_DEL };
            h = if h >= e { h } else { e };
            d = if h >= f { d } else { TB_INS };
            h = if h >= f { h } else { f };
            h1 = h;

            if h >= max {
                max = h;
                max_j = j;
            }

            h -= gapoe;
            e -= gape;
            if e > h {
                d |= TB_DEL_CONT;
            } else {
                e = h;
            }
            p.e = e;

            f -= gape;
            if f > h {
                d |= TB_INS_CONT;
            } else {
                f = h;
            }

            zi[(j - st) as usize] = d;
        }
        eh[en as usize + 1].h = h1;
        eh[en as usize + 1].e = NEG_INF;
        last_row = i;

        if apply_zdrop(&mut ez, max, i, max_j, zdrop, gape) {
            break;
        }
        if i == tlen - 1 && en == qlen - 1 {
            ez.score = eh[qlen as usize].h;
        }
    }

    if last_row < 0 {
        return ez;
    }

    let from_corner = !extension_only && !ez.zdropped && ez.score > NEG_INF;
    if from_corner {
        ez.cigar = backtrack(z, off, row_end, n_col, tlen - 1, qlen - 1);
    } else if ez.max_t >= 0 && ez.max_q >= 0 {
        ez.cigar = backtrack(z, off, row_end, n_col, ez.max_t, ez.max_q);
    }

    ez
}

fn apply_zdrop(ez: &mut ExtzResult, h: i32, i: i32, max_j: i32, zdrop: i32, gape: i32) -> bool {
    if h > ez.max {
        ez.max = h;
        ez.max_t = i;
        ez.max_q = max_j;
    } else if i >= ez.max_t && max_j >= ez.max_q {
        let tl = i - ez.max_t;
        let ql = max_j - ez.max_q;
        let l = (tl - ql).abs();
        if zdrop >= 0 && ez.max - h > zdrop + l * gape {
            ez.zdropped = true;
            return true;
        }
    }
    false
}

/// Walk the direction bytes back from `(i0, j0)` and return a forward cigar.
fn backtrack(
    z: &[u8],
    off: &[i32],
    row_end: &[i32],
    n_col: usize,
    i0: i32,
    j0: i32,
) -> Vec<(u8, u32)> {
    let mut cigar: Vec<(u8, u32)> = Vec::new();
    let (mut i, mut j) = (i0, j0);
    let mut state = TB_MATCH;

    while i >= 0 && j >= 0 {
        let row = i as usize;
        let forced = if j < off[row] {
            Some(TB_INS)
        } else if j > row_end[row] {
            Some(TB_DEL)
        } else {
            None
        };
        let tmp = match forced {
            None => z[row * n_col + (j - off[row]) as usize],
            Some(_) => 0,
        };

        if state == TB_MATCH || (tmp >> (state + 2)) & 1 == 0 {
            state = tmp & 7;
        }
        if let Some(s) = forced {
            state = s;
        }

        match state {
            TB_MATCH => {
                push_raw_op(&mut cigar, b'M', 1);
                i -= 1;
                j -= 1;
            }
            TB_DEL => {
                push_raw_op(&mut cigar, b'D', 1);
                i -= 1;
            }
            _ => {
                push_raw_op(&mut cigar, b'I', 1);
                j -= 1;
            }
        }
    }
    if i >= 0 {
        push_raw_op(&mut cigar, b'D', (i + 1) as u32);
    }
    if j >= 0 {
        push_raw_op(&mut cigar, b'I', (j + 1) as u32);
    }

    cigar.reverse();
    cigar
}
