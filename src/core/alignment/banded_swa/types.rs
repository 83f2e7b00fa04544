use crate::core::compute::encoding::{ALPHABET_SIZE, AMBIGUOUS_CODE};
use crate::core::stats::GapScoring;

/// Score used for cells outside the band. Far enough from `i32::MIN` that
/// adding gap penalties never overflows.
pub const NEG_INF: i32 = -0x4000_0000;

// Direction bits stored per banded cell
pub const TB_MATCH: u8 = 0;
pub const TB_DEL: u8 = 1; // H came from E (target base against a gap)
pub const TB_INS: u8 = 2; // H came from F (query base against a gap)
pub const TB_DEL_CONT: u8 = 0x08; // E at the next row continues this gap
pub const TB_INS_CONT: u8 = 0x10; // F at the next column continues this gap

// One banded DP cell
#[derive(Debug, Clone, Copy, Default)]
pub struct EhT {
    pub h: i32, // H score (best score ending here)
    pub e: i32, // E score (gap in query, opened towards the next row)
}

/// Scoring and buffers of the scalar banded kernel.
///
/// The buffers are kept between calls so a worker aligning thousands of
/// windows only grows them to its largest window once.
#[derive(Debug, Clone)]
pub struct BandedPairWiseSW {
    mat: [i8; ALPHABET_SIZE * ALPHABET_SIZE],
    gap_open: i32,
    gap_extend: i32,
    pub(crate) query_profile: Vec<i8>,
    pub(crate) eh: Vec<EhT>,
    pub(crate) traceback: Vec<u8>,
    pub(crate) row_offset: Vec<i32>,
    pub(crate) row_end: Vec<i32>,
}

impl BandedPairWiseSW {
    pub fn new(scoring: GapScoring) -> Self {
        Self {
            mat: simple_scoring_matrix(scoring.reward, scoring.penalty),
            gap_open: scoring.gap_open,
            gap_extend: scoring.gap_extend,
            query_profile: Vec::new(),
            eh: Vec::new(),
            traceback: Vec::new(),
            row_offset: Vec::new(),
            row_end: Vec::new(),
        }
    }

    /// Returns the gap open penalty
    pub fn gap_open(&self) -> i32 {
        self.gap_open
    }

    /// Returns the gap extension penalty
    pub fn gap_extend(&self) -> i32 {
        self.gap_extend
    }

    /// Returns the scoring matrix
    pub fn scoring_matrix(&self) -> &[i8; ALPHABET_SIZE * ALPHABET_SIZE] {
        &self.mat
    }
}

/// 5x5 matrix: `reward` on the A/C/G/T diagonal, `penalty` everywhere else,
/// including every cell that involves N.
pub fn simple_scoring_matrix(reward: i32, penalty: i32) -> [i8; ALPHABET_SIZE * ALPHABET_SIZE] {
    let mut mat = [0i8; ALPHABET_SIZE * ALPHABET_SIZE];
    for a in 0..ALPHABET_SIZE {
        for b in 0..ALPHABET_SIZE {
            let same = a == b && (a as u8) < AMBIGUOUS_CODE;
            mat[a * ALPHABET_SIZE + b] = if same { reward as i8 } else { penalty as i8 };
        }
    }
    mat
}

/// Raw outcome of one banded DP run, before mode-specific interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtzResult {
    /// Best score seen anywhere (at least 0).
    pub max: i32,
    /// Target index of `max`, -1 if nothing scored above 0.
    pub max_t: i32,
    /// Query index of `max`, -1 if nothing scored above 0.
    pub max_q: i32,
    /// End-to-end score, `NEG_INF` if the corner was not reached.
    pub score: i32,
    pub zdropped: bool,
    /// Edit script in forward orientation.
    pub cigar: Vec<(u8, u32)>,
}

impl Default for ExtzResult {
    fn default() -> Self {
        Self {
            max: 0,
            max_t: -1,
            max_q: -1,
            score: NEG_INF,
            zdropped: false,
            cigar: Vec::new(),
        }
    }
}
