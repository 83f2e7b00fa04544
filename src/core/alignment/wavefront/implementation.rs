//! Gap-affine wavefront alignment with X-drop.
//!
//! Wavefronts are indexed by penalty `s` and diagonal `k = h - v`, where `h`
//! is the target offset and `v` the query offset. Each wavefront stores the
//! furthest-reaching target offset of three components: `M` (ends in an
//! aligned pair), `I` (ends in a query base against a gap) and `D` (ends in
//! a target base against a gap).
//!
//! Scores use a match reward, so penalties are transformed to keep the
//! recurrence monotone:
//!
//! ```text
//!   x' = 2 (a + b)      mismatch
//!   o' = 2 o            gap open
//!   e' = 2 e + a        gap extend
//!   score = (a (h + v) - s) / 2
//! ```
//!
//! where `a` is the match reward, `b` the mismatch magnitude, and a gap of
//! length `L` costs `o + e L`.

use crate::core::alignment::types::push_raw_op;
use crate::core::compute::encoding::AMBIGUOUS_CODE;
use crate::core::stats::GapScoring;

const OFFSET_NULL: i32 = i32::MIN / 2;

/// Transformed penalties (see module docs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavefrontPenalties {
    pub match_reward: i32,
    pub mismatch: i32,
    pub gap_open: i32,
    pub gap_extend: i32,
}

impl WavefrontPenalties {
    pub fn from_scoring(scoring: GapScoring) -> Self {
        let a = scoring.reward;
        Self {
            match_reward: a,
            mismatch: 2 * (a + scoring.penalty.abs()),
            gap_open: 2 * scoring.gap_open,
            gap_extend: 2 * scoring.gap_extend + a,
        }
    }

    /// Largest distance in `s` between a wavefront and any of its sources.
    fn max_step(&self) -> i32 {
        self.mismatch.max(self.gap_open + self.gap_extend)
    }
}

#[derive(Debug, Clone)]
struct Wavefront {
    lo: i32,
    hi: i32,
    m: Vec<i32>,
    i: Vec<i32>,
    d: Vec<i32>,
}

impl Wavefront {
    fn new(lo: i32, hi: i32) -> Self {
        let n = (hi - lo + 1) as usize;
        Self {
            lo,
            hi,
            m: vec![OFFSET_NULL; n],
            i: vec![OFFSET_NULL; n],
            d: vec![OFFSET_NULL; n],
        }
    }

    #[inline]
    fn idx(&self, k: i32) -> Option<usize> {
        if k < self.lo || k > self.hi {
            None
        } else {
            Some((k - self.lo) as usize)
        }
    }

    #[inline]
    fn m_at(&self, k: i32) -> i32 {
        self.idx(k).map_or(OFFSET_NULL, |x| self.m[x])
    }

    #[inline]
    fn i_at(&self, k: i32) -> i32 {
        self.idx(k).map_or(OFFSET_NULL, |x| self.i[x])
    }

    #[inline]
    fn d_at(&self, k: i32) -> i32 {
        self.idx(k).map_or(OFFSET_NULL, |x| self.d[x])
    }
}

/// Result of one wavefront run, in forward orientation of its inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WfaOutcome {
    pub score: i32,
    pub dropped: bool,
    /// Furthest target / query offsets reached by the reported path.
    pub end_h: i32,
    pub end_v: i32,
    pub cigar: Vec<(u8, u32)>,
}

/// Reusable wavefront storage.
#[derive(Debug, Default, Clone)]
pub struct WavefrontStore {
    fronts: Vec<Option<Wavefront>>,
}

impl WavefrontStore {
    #[inline]
    fn get(&self, s: i32) -> Option<&Wavefront> {
        if s < 0 {
            None
        } else {
            self.fronts.get(s as usize).and_then(|w| w.as_ref())
        }
    }
}

struct Problem<'a> {
    target: &'a [u8],
    query: &'a [u8],
    pen: WavefrontPenalties,
}

impl Problem<'_> {
    #[inline]
    fn tlen(&self) -> i32 {
        self.target.len() as i32
    }

    #[inline]
    fn qlen(&self) -> i32 {
        self.query.len() as i32
    }

    #[inline]
    fn in_bounds(&self, h: i32, k: i32) -> bool {
        let v = h - k;
        h >= 0 && v >= 0 && h <= self.tlen() && v <= self.qlen()
    }

    /// Slide along exact matches; N never matches.
    #[inline]
    fn extend(&self, mut h: i32, k: i32) -> i32 {
        let mut v = h - k;
        while h < self.tlen() && v < self.qlen() {
            let t = self.target[h as usize];
            if t >= AMBIGUOUS_CODE || t != self.query[v as usize] {
                break;
            }
            h += 1;
            v += 1;
        }
        h
    }

    /// Twice the alignment score of an M cell.
    #[inline]
    fn doubled_score(&self, h: i32, k: i32, s: i32) -> i32 {
        self.pen.match_reward * (2 * h - k) - s
    }
}

/// Align `query` against `target`.
///
/// With `global` the alignment must end at the bottom-right corner; the
/// diagonal band then spans `[min(0, kend) - band, max(0, kend) + band]`.
/// Otherwise the end point is free and the band is `[-band, band]`.
/// `zdrop` stops the run once every cell of the current wavefront scores more
/// than `zdrop` below the best cell seen. A negative `band` or `zdrop`
/// disables the corresponding limit.
pub fn wavefront_align(
    store: &mut WavefrontStore,
    pen: WavefrontPenalties,
    target: &[u8],
    query: &[u8],
    global: bool,
    band: i32,
    zdrop: i32,
) -> WfaOutcome {
    let p = Problem { target, query, pen };
    let tlen = p.tlen();
    let qlen = p.qlen();
    let kend = tlen - qlen;

    let (band_lo, band_hi) = if band < 0 {
        (-qlen, tlen)
    } else if global {
        (kend.min(0) - band, kend.max(0) + band)
    } else {
        (-band, band)
    };
    let band_lo = band_lo.max(-qlen);
    let band_hi = band_hi.min(tlen);

    store.fronts.clear();

    let mut first = Wavefront::new(0, 0);
    first.m[0] = p.extend(0, 0);
    let mut best = (p.doubled_score(first.m[0], 0, 0), 0, 0, first.m[0]);
    store.fronts.push(Some(first));

    let max_step = pen.max_step();
    let mut empty_streak = 0;
    let mut s = 0;

    let finished = |store: &WavefrontStore, s: i32| -> bool {
        global && store.get(s).map_or(false, |w| w.m_at(kend) >= tlen)
    };

    if finished(store, 0) {
        return traceback(store, &p, 0, kend, tlen, false);
    }

    loop {
        s += 1;
        let front = next_wavefront(store, &p, s, band_lo, band_hi);
        let Some(front) = front else {
            store.fronts.push(None);
            empty_streak += 1;
            if empty_streak > max_step {
                break;
            }
            continue;
        };
        empty_streak = 0;

        let mut cur_max = i32::MIN;
        for k in front.lo..=front.hi {
            let h = front.m_at(k);
            if h < 0 {
                continue;
            }
            let val = p.doubled_score(h, k, s);
            cur_max = cur_max.max(val);
            if val > best.0 {
                best = (val, s, k, h);
            }
        }
        store.fronts.push(Some(front));

        if finished(store, s) {
            return traceback(store, &p, s, kend, tlen, false);
        }
        if zdrop >= 0 && cur_max != i32::MIN && best.0 - cur_max > 2 * zdrop {
            let (_, bs, bk, bh) = best;
            return traceback(store, &p, bs, bk, bh, true);
        }
        if !global && s > pen.match_reward * (tlen + qlen) - best.0 {
            break;
        }
    }

    // Free end point, or a global run whose band can no longer grow
    let (_, bs, bk, bh) = best;
    traceback(store, &p, bs, bk, bh, global)
}

fn next_wavefront(
    store: &WavefrontStore,
    p: &Problem<'_>,
    s: i32,
    band_lo: i32,
    band_hi: i32,
) -> Option<Wavefront> {
    let pen = p.pen;
    let m_mis = store.get(s - pen.mismatch);
    let m_open = store.get(s - pen.gap_open - pen.gap_extend);
    let i_ext = store.get(s - pen.gap_extend);
    let d_ext = i_ext;

    let mut lo = i32::MAX;
    let mut hi = i32::MIN;
    for w in [m_mis, m_open, i_ext].into_iter().flatten() {
        lo = lo.min(w.lo);
        hi = hi.max(w.hi);
    }
    if lo > hi {
        return None;
    }
    let lo = (lo - 1).max(band_lo);
    let hi = (hi + 1).min(band_hi);
    if lo > hi {
        return None;
    }

    let mut front = Wavefront::new(lo, hi);
    let mut any = false;
    for k in lo..=hi {
        let x = (k - lo) as usize;

        let ins = m_open
            .map_or(OFFSET_NULL, |w| w.m_at(k + 1))
            .max(i_ext.map_or(OFFSET_NULL, |w| w.i_at(k + 1)));
        let ins = if ins >= 0 && p.in_bounds(ins, k) {
            ins
        } else {
            OFFSET_NULL
        };

        let del = m_open
            .map_or(OFFSET_NULL, |w| w.m_at(k - 1))
            .max(d_ext.map_or(OFFSET_NULL, |w| w.d_at(k - 1)));
        let del = if del >= 0 && p.in_bounds(del + 1, k) {
            del + 1
        } else {
            OFFSET_NULL
        };

        let mis = m_mis.map_or(OFFSET_NULL, |w| w.m_at(k));
        let mis = if mis >= 0 && p.in_bounds(mis + 1, k) {
            mis + 1
        } else {
            OFFSET_NULL
        };

        front.i[x] = ins;
        front.d[x] = del;
        let m = mis.max(ins).max(del);
        if m >= 0 {
            front.m[x] = p.extend(m, k);
            any = true;
        }
    }

    any.then_some(front)
}

fn traceback(
    store: &WavefrontStore,
    p: &Problem<'_>,
    s_end: i32,
    k_end: i32,
    h_end: i32,
    dropped: bool,
) -> WfaOutcome {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum State {
        M,
        I,
        D,
    }

    let pen = p.pen;
    let mut cigar: Vec<(u8, u32)> = Vec::new();
    let (mut s, mut k, mut h) = (s_end, k_end, h_end);
    let mut state = State::M;

    loop {
        match state {
            State::M => {
                if s == 0 {
                    // The initial wavefront starts at (0, 0) on diagonal 0
                    push_raw_op(&mut cigar, b'=', h.max(0) as u32);
                    break;
                }
                let Some(cur) = store.get(s) else { break };
                let mis = store.get(s - pen.mismatch).map_or(OFFSET_NULL, |w| w.m_at(k));
                let mis = if mis >= 0 && p.in_bounds(mis + 1, k) {
                    mis + 1
                } else {
                    OFFSET_NULL
                };
                let ins = cur.i_at(k);
                let del = cur.d_at(k);
                let src = mis.max(ins).max(del);
                if src < 0 {
                    break;
                }
                push_raw_op(&mut cigar, b'=', (h - src) as u32);
                h = src;
                if src == del {
                    state = State::D;
                } else if src == ins {
                    state = State::I;
                } else {
                    push_raw_op(&mut cigar, b'X', 1);
                    h -= 1;
                    s -= pen.mismatch;
                }
            }
            State::D => {
                push_raw_op(&mut cigar, b'D', 1);
                h -= 1;
                k -= 1;
                let open = store
                    .get(s - pen.gap_open - pen.gap_extend)
                    .map_or(OFFSET_NULL, |w| w.m_at(k));
                if open == h {
                    s -= pen.gap_open + pen.gap_extend;
                    state = State::M;
                } else {
                    s -= pen.gap_extend;
                }
            }
            State::I => {
                push_raw_op(&mut cigar, b'I', 1);
                k += 1;
                let open = store
                    .get(s - pen.gap_open - pen.gap_extend)
                    .map_or(OFFSET_NULL, |w| w.m_at(k));
                if open == h {
                    s -= pen.gap_open + pen.gap_extend;
                    state = State::M;
                } else {
                    s -= pen.gap_extend;
                }
            }
        }
    }

    cigar.reverse();
    WfaOutcome {
        score: p.doubled_score(h_end, k_end, s_end) / 2,
        dropped,
        end_h: h_end,
        end_v: h_end - k_end,
        cigar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::compute::encoding::encode_sequence;

    fn pen() -> WavefrontPenalties {
        WavefrontPenalties::from_scoring(GapScoring {
            reward: 2,
            penalty: -3,
            gap_open: 5,
            gap_extend: 2,
        })
    }

    #[test]
    fn test_penalty_transform() {
        let p = pen();
        assert_eq!((p.mismatch, p.gap_open, p.gap_extend), (10, 10, 6));
    }

    #[test]
    fn test_identical_global() {
        let s = encode_sequence(b"ACGTACGTACGT");
        let mut store = WavefrontStore::default();
        let out = wavefront_align(&mut store, pen(), &s, &s, true, 10, -1);
        assert_eq!(out.score, 24);
        assert_eq!(out.cigar, vec![(b'=', 12)]);
        assert!(!out.dropped);
    }

    #[test]
    fn test_global_mismatch_and_gap() {
        let q = encode_sequence(b"ACGTTGCAACGTAA");
        let t = encode_sequence(b"ACGTTGGCAACGTCA");
        let mut store = WavefrontStore::default();
        let out = wavefront_align(&mut store, pen(), &t, &q, true, 10, -1);
        // 13 matches, 1 mismatch, 1 deletion of length 1
        assert_eq!(out.score, 26 - 3 - 7);
        let d: u32 = out.cigar.iter().filter(|c| c.0 == b'D').map(|c| c.1).sum();
        let x: u32 = out.cigar.iter().filter(|c| c.0 == b'X').map(|c| c.1).sum();
        assert_eq!((d, x), (1, 1));
    }

    #[test]
    fn test_extension_free_end() {
        let q = encode_sequence(b"ACGTACGTACGGGGGGGGGGGG");
        let t = encode_sequence(b"ACGTACGTACTTTTTTTTTTTT");
        let mut store = WavefrontStore::default();
        let out = wavefront_align(&mut store, pen(), &t, &q, false, 10, 20);
        assert_eq!(out.score, 20);
        assert_eq!((out.end_h, out.end_v), (10, 10));
        assert_eq!(out.cigar, vec![(b'=', 10)]);
    }
}
