use crate::core::error::AlignError;

/// Which part of the dynamic-programming matrix an aligner explores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignMode {
    /// Extension towards the sequence starts. Inputs are aligned reversed and
    /// the edit script is handed back in forward orientation.
    Left,
    /// Extension towards the sequence ends, free end point.
    Right,
    /// End-to-end alignment of both windows.
    Global,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentStatus {
    NotDropped,
    /// The z-drop / x-drop heuristic stopped the alignment early.
    Dropped,
    /// The accumulated alignment score fell below 1.
    NegativeScore,
}

/// Output of a single aligner invocation.
///
/// `cigar` holds raw `(op, len)` pairs with ops from `M = X I D`.
/// `max_query` / `max_target` are the 0-based indices of the furthest bases
/// consumed by the best-scoring path, or -1 if none were consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignResult {
    pub status: AlignmentStatus,
    pub cigar: Vec<(u8, u32)>,
    pub score: i32,
    pub max_query: i32,
    pub max_target: i32,
}

impl AlignResult {
    /// Nothing aligned: score 0, no operations.
    pub fn empty() -> Self {
        Self {
            status: AlignmentStatus::NotDropped,
            cigar: Vec::new(),
            score: 0,
            max_query: -1,
            max_target: -1,
        }
    }
}

/// Validated edit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CigarOp {
    /// `M`: aligned column, match or mismatch not yet resolved.
    AlignmentMatch,
    /// `=`
    Match,
    /// `X`
    Mismatch,
    /// `I`: query base against a gap in the target.
    Insertion,
    /// `D`: target base against a gap in the query.
    Deletion,
}

impl CigarOp {
    pub fn to_byte(self) -> u8 {
        match self {
            CigarOp::AlignmentMatch => b'M',
            CigarOp::Match => b'=',
            CigarOp::Mismatch => b'X',
            CigarOp::Insertion => b'I',
            CigarOp::Deletion => b'D',
        }
    }

    #[inline]
    pub fn consumes_query(self) -> bool {
        !matches!(self, CigarOp::Deletion)
    }

    #[inline]
    pub fn consumes_target(self) -> bool {
        !matches!(self, CigarOp::Insertion)
    }
}

impl TryFrom<u8> for CigarOp {
    type Error = AlignError;

    fn try_from(symbol: u8) -> Result<Self, Self::Error> {
        match symbol {
            b'M' => Ok(CigarOp::AlignmentMatch),
            b'=' => Ok(CigarOp::Match),
            b'X' => Ok(CigarOp::Mismatch),
            b'I' => Ok(CigarOp::Insertion),
            b'D' => Ok(CigarOp::Deletion),
            other => Err(AlignError::MalformedCigar {
                symbol: other as char,
            }),
        }
    }
}

/// Append `(op, len)` to a raw cigar, merging with the last run.
#[inline]
pub fn push_raw_op(cigar: &mut Vec<(u8, u32)>, op: u8, len: u32) {
    if len == 0 {
        return;
    }
    match cigar.last_mut() {
        Some(last) if last.0 == op => last.1 += len,
        _ => cigar.push((op, len)),
    }
}

/// Total query and target bases consumed by a raw cigar.
pub fn raw_cigar_lengths(cigar: &[(u8, u32)]) -> (u32, u32) {
    cigar.iter().fold((0, 0), |(q, t), &(op, len)| match op {
        b'I' => (q + len, t),
        b'D' => (q, t + len),
        _ => (q + len, t + len),
    })
}
