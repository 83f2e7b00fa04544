//! High-scoring segment pairs and per-target matches.

use crate::core::alignment::CigarOp;
use crate::core::stats::ScoringModel;
use crate::pipelines::linear::chaining::Chain;
use crate::pipelines::linear::region::ExtensionCigar;
use crate::pipelines::linear::seeding::Anchor;

/// Half-open interval `[begin, end)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Interval {
    pub begin: i32,
    pub end: i32,
}

impl Interval {
    pub fn new(begin: i32, end: i32) -> Self {
        Self { begin, end }
    }

    pub fn len(&self) -> i32 {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.begin
    }

    /// Length of the shared part, negative if disjoint.
    pub fn overlap(&self, other: &Interval) -> i32 {
        self.end.min(other.end) - self.begin.max(other.begin)
    }
}

/// Resolved edit operation in an HSP transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditOp {
    Match,
    Mismatch,
    Insertion,
    Deletion,
}

impl EditOp {
    pub fn symbol(self) -> char {
        match self {
            EditOp::Match => '=',
            EditOp::Mismatch => 'X',
            EditOp::Insertion => 'I',
            EditOp::Deletion => 'D',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strand {
    #[default]
    Forward,
    Reverse,
}

impl Strand {
    pub fn from_reverse(is_reverse: bool) -> Self {
        if is_reverse {
            Strand::Reverse
        } else {
            Strand::Forward
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Strand::Forward => '+',
            Strand::Reverse => '-',
        }
    }
}

/// One gapped local alignment of a query against a target.
///
/// `query_range` is in forward-query coordinates on both strands.
/// `transcript` runs in the orientation of the aligned query, so for
/// reverse-strand hits it walks the reverse complement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hsp {
    pub query_range: Interval,
    pub subject_range: Interval,
    pub score: i32,
    pub bit_score: f64,
    pub evalue: f64,
    pub transcript: Vec<(u32, EditOp)>,
    pub identities: i32,
    pub mismatches: i32,
    pub gap_openings: i32,
    pub length: i32,
    pub strand: Strand,
    pub mapping_quality: Option<u8>,
    pub n_anchors: Option<usize>,
}

impl Hsp {
    fn push_op(&mut self, op: EditOp, len: u32) {
        if len == 0 {
            return;
        }
        match self.transcript.last_mut() {
            Some(last) if last.1 == op => last.0 += len,
            _ => {
                if matches!(op, EditOp::Insertion | EditOp::Deletion) {
                    self.gap_openings += 1;
                }
                self.transcript.push((len, op));
            }
        }
        match op {
            EditOp::Match => self.identities += len as i32,
            EditOp::Mismatch => self.mismatches += len as i32,
            _ => {}
        }
        self.length += len as i32;
    }

    pub fn percent_identity(&self) -> f64 {
        if self.length == 0 {
            0.0
        } else {
            100.0 * self.identities as f64 / self.length as f64
        }
    }

    pub fn is_reverse(&self) -> bool {
        self.strand == Strand::Reverse
    }

    /// Query and target bases covered by the transcript.
    pub fn transcript_lengths(&self) -> (i32, i32) {
        self.transcript.iter().fold((0, 0), |(q, t), &(len, op)| {
            let len = len as i32;
            match op {
                EditOp::Insertion => (q + len, t),
                EditOp::Deletion => (q, t + len),
                _ => (q + len, t + len),
            }
        })
    }
}

/// All reported HSPs of one query against one target.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub target_id: u32,
    pub hsps: Vec<Hsp>,
}

impl Match {
    pub fn new(target_id: u32) -> Self {
        Self {
            target_id,
            hsps: Vec::new(),
        }
    }

    pub fn best_score(&self) -> i32 {
        self.hsps.iter().map(|h| h.score).max().unwrap_or(0)
    }
}

#[inline]
fn mirror(range: Interval, query_len: i32) -> Interval {
    Interval::new(query_len - range.end, query_len - range.begin)
}

/// Replay an edit script from the first anchor and score the result.
///
/// `query` is the strand the chain was built on. The alignment starts
/// `extension_distance + 1` bases before the first anchor on each axis.
pub fn build_hsp_from_cigar(
    cigar: &ExtensionCigar,
    anchor_query_start: i32,
    anchor_target_start: i32,
    query: &[u8],
    target: &[u8],
    is_reverse: bool,
    scoring: &dyn ScoringModel,
) -> Hsp {
    let mut hsp = Hsp {
        strand: Strand::from_reverse(is_reverse),
        ..Hsp::default()
    };

    let mut q = (anchor_query_start - cigar.query_extension_distance() - 1) as usize;
    let mut t = (anchor_target_start - cigar.target_extension_distance() - 1) as usize;
    let (q_begin, t_begin) = (q as i32, t as i32);

    for &(len, op) in cigar.ops() {
        match op {
            CigarOp::AlignmentMatch | CigarOp::Match | CigarOp::Mismatch => {
                for _ in 0..len {
                    let same = query[q] == target[t] && query[q] < 4;
                    hsp.push_op(if same { EditOp::Match } else { EditOp::Mismatch }, 1);
                    q += 1;
                    t += 1;
                }
            }
            CigarOp::Insertion => {
                hsp.push_op(EditOp::Insertion, len);
                q += len as usize;
            }
            CigarOp::Deletion => {
                hsp.push_op(EditOp::Deletion, len);
                t += len as usize;
            }
        }
    }

    let aligned = Interval::new(q_begin, q as i32);
    hsp.query_range = if is_reverse {
        mirror(aligned, query.len() as i32)
    } else {
        aligned
    };
    hsp.subject_range = Interval::new(t_begin, t as i32);
    hsp.score = cigar.score;
    hsp.bit_score = scoring.bit_score(hsp.score);
    hsp.evalue = scoring.evalue(hsp.score, query.len());
    hsp
}

/// Bases of the chain covered by anchors, counting overlaps once.
pub fn compute_residue_matches(anchors: &[Anchor]) -> i32 {
    let Some(first) = anchors.last() else {
        return 0;
    };
    let mut total = first.span;
    for k in (1..anchors.len()).rev() {
        let (cur, next) = (&anchors[k], &anchors[k - 1]);
        total += next
            .span
            .min(next.query_end - cur.query_end)
            .min(next.target_end - cur.target_end);
    }
    total
}

/// Report chains directly as HSPs, without gapped extension.
///
/// Ranges span the chain's anchors, `length` is the longer of the two spans
/// and `score` is the chain score.
pub fn build_map_hsps(chains: &[Chain], query_len: usize, scoring: &dyn ScoringModel) -> Vec<Hsp> {
    chains
        .iter()
        .filter(|c| !c.anchors.is_empty())
        .map(|chain| {
            let query_range = Interval::new(chain.query_start(), chain.query_end());
            Hsp {
                query_range: if chain.is_reverse {
                    mirror(query_range, query_len as i32)
                } else {
                    query_range
                },
                subject_range: Interval::new(chain.target_start(), chain.target_end()),
                score: chain.score,
                bit_score: scoring.bit_score(chain.score),
                evalue: scoring.evalue(chain.score, query_len),
                identities: compute_residue_matches(&chain.anchors),
                length: chain.query_span().max(chain.target_span()),
                strand: Strand::from_reverse(chain.is_reverse),
                mapping_quality: Some(chain.mapping_quality),
                n_anchors: Some(chain.anchors.len()),
                ..Hsp::default()
            }
        })
        .collect()
}
