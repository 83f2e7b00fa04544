//! Karlin-Altschul statistics for nucleotide scoring schemes.
//!
//! Raw alignment scores are converted into bit scores with
//! `S' = (lambda * S - ln K) / ln 2` and into E-values over the whole target
//! database with `E = m * n * 2^-S'`, where `m` is the query length and `n`
//! the number of letters in the database.

/// The statistical and scoring parameters the pipeline consumes.
///
/// `penalty` is negative. Implementations are shared read-only between
/// worker threads.
pub trait ScoringModel: Send + Sync {
    fn reward(&self) -> i32;
    fn penalty(&self) -> i32;
    fn gap_open(&self) -> i32;
    fn gap_extend(&self) -> i32;
    fn bit_score(&self, raw_score: i32) -> f64;
    fn evalue(&self, raw_score: i32, query_len: usize) -> f64;
}

/// The integer scoring subset the aligners need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapScoring {
    pub reward: i32,
    /// Negative mismatch score.
    pub penalty: i32,
    pub gap_open: i32,
    pub gap_extend: i32,
}

impl GapScoring {
    pub fn from_model(model: &dyn ScoringModel) -> Self {
        Self {
            reward: model.reward(),
            penalty: model.penalty(),
            gap_open: model.gap_open(),
            gap_extend: model.gap_extend(),
        }
    }

    /// Cost of a gap run of `len` bases: `gap_open + len * gap_extend`.
    #[inline]
    pub fn gap_cost(&self, len: i32) -> i32 {
        self.gap_open + len * self.gap_extend
    }
}

/// Karlin-Altschul parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KarlinParams {
    pub lambda: f64,
    pub k: f64,
    /// Relative entropy, kept for reporting.
    pub h: f64,
}

// (gap_open, gap_extend, lambda, K, H). The (0, 0) row is the ungapped fallback.
type ParamRow = (i32, i32, f64, f64, f64);

/// reward=1, penalty=-2
const BLASTN_1_2: &[ParamRow] = &[
    (0, 0, 1.28, 0.46, 0.85),
    (2, 2, 1.33, 0.62, 1.1),
    (1, 2, 1.30, 0.52, 0.93),
    (0, 2, 1.19, 0.34, 0.66),
    (3, 1, 1.32, 0.57, 1.0),
    (2, 1, 1.29, 0.49, 0.92),
    (1, 1, 1.14, 0.26, 0.52),
];

/// reward=1, penalty=-3
const BLASTN_1_3: &[ParamRow] = &[
    (0, 0, 1.374, 0.711, 1.31),
    (2, 2, 1.37, 0.70, 1.2),
    (1, 2, 1.35, 0.64, 1.1),
    (0, 2, 1.25, 0.42, 0.83),
    (2, 1, 1.34, 0.60, 1.1),
    (1, 1, 1.21, 0.34, 0.71),
];

/// reward=2, penalty=-3
const BLASTN_2_3: &[ParamRow] = &[
    (0, 0, 0.55, 0.21, 0.46),
    (4, 4, 0.63, 0.42, 0.84),
    (2, 4, 0.615, 0.37, 0.72),
    (0, 4, 0.55, 0.21, 0.46),
    (3, 3, 0.615, 0.37, 0.68),
    (6, 2, 0.63, 0.42, 0.84),
    (5, 2, 0.625, 0.41, 0.78),
    (4, 2, 0.61, 0.35, 0.68),
    (2, 2, 0.515, 0.14, 0.33),
];

/// reward=2, penalty=-5
const BLASTN_2_5: &[ParamRow] = &[
    (0, 0, 0.675, 0.65, 1.1),
    (2, 4, 0.67, 0.59, 1.1),
    (0, 4, 0.62, 0.39, 0.78),
    (4, 2, 0.67, 0.61, 1.0),
    (2, 2, 0.56, 0.32, 0.59),
];

/// Look up parameters for a reward/penalty/gap combination.
///
/// Unknown gap costs fall back to the ungapped row of the matching table;
/// unknown reward/penalty pairs fall back to the reward=1, penalty=-2 table.
pub fn lookup_params(reward: i32, penalty: i32, gap_open: i32, gap_extend: i32) -> KarlinParams {
    let table = match (reward, penalty.abs()) {
        (1, 2) => BLASTN_1_2,
        (1, 3) => BLASTN_1_3,
        (2, 3) => BLASTN_2_3,
        (2, 5) => BLASTN_2_5,
        _ => {
            log::warn!(
                "No Karlin-Altschul parameters for reward {} / penalty {}, using 1/-2",
                reward,
                penalty
            );
            BLASTN_1_2
        }
    };

    let row = table
        .iter()
        .find(|r| r.0 == gap_open && r.1 == gap_extend)
        .unwrap_or(&table[0]);

    KarlinParams {
        lambda: row.2,
        k: row.3,
        h: row.4,
    }
}

/// Scoring model backed by the Karlin-Altschul tables.
#[derive(Debug, Clone)]
pub struct KarlinScoring {
    reward: i32,
    penalty: i32,
    gap_open: i32,
    gap_extend: i32,
    params: KarlinParams,
    db_letters: u64,
}

impl KarlinScoring {
    pub fn new(reward: i32, penalty: i32, gap_open: i32, gap_extend: i32, db_letters: u64) -> Self {
        let penalty = -penalty.abs();
        Self {
            reward,
            penalty,
            gap_open,
            gap_extend,
            params: lookup_params(reward, penalty, gap_open, gap_extend),
            db_letters,
        }
    }

    pub fn params(&self) -> &KarlinParams {
        &self.params
    }

    pub fn db_letters(&self) -> u64 {
        self.db_letters
    }
}

impl ScoringModel for KarlinScoring {
    fn reward(&self) -> i32 {
        self.reward
    }

    fn penalty(&self) -> i32 {
        self.penalty
    }

    fn gap_open(&self) -> i32 {
        self.gap_open
    }

    fn gap_extend(&self) -> i32 {
        self.gap_extend
    }

    fn bit_score(&self, raw_score: i32) -> f64 {
        (self.params.lambda * raw_score as f64 - self.params.k.ln()) / std::f64::consts::LN_2
    }

    fn evalue(&self, raw_score: i32, query_len: usize) -> f64 {
        let space = query_len as f64 * self.db_letters as f64;
        space * 2f64.powf(-self.bit_score(raw_score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_default_blastn() {
        let p = lookup_params(2, -3, 5, 2);
        assert_eq!(p.lambda, 0.625);
        assert_eq!(p.k, 0.41);
    }

    #[test]
    fn test_lookup_falls_back_to_ungapped_row() {
        let p = lookup_params(2, -3, 11, 7);
        assert_eq!(p.lambda, 0.55);
    }

    #[test]
    fn test_bit_score_value() {
        let s = KarlinScoring::new(2, -3, 5, 2, 1_000_000);
        let expected = (0.625 * 100.0 - 0.41f64.ln()) / 2f64.ln();
        assert!((s.bit_score(100) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_evalue_decreases_with_score() {
        let s = KarlinScoring::new(2, 3, 5, 2, 1_000_000);
        assert_eq!(s.penalty(), -3);
        let mut last = f64::INFINITY;
        for raw in [10, 20, 50, 100, 500] {
            let e = s.evalue(raw, 1000);
            assert!(e < last, "E-value must fall as score rises");
            last = e;
        }
    }

    #[test]
    fn test_gap_cost() {
        let g = GapScoring {
            reward: 2,
            penalty: -3,
            gap_open: 5,
            gap_extend: 2,
        };
        assert_eq!(g.gap_cost(5), 15);
    }
}
