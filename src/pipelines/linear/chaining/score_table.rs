/// Per-anchor DP state for one target group, stored as parallel arrays.
///
/// Owned by a worker's `SearchWorkspace` and reset in place for every
/// target group, so the backing allocations survive across queries.
#[derive(Debug, Default)]
pub struct AnchorScoreTable {
    pub best_score: Vec<i32>,
    /// Index of the chosen predecessor, `-1` for none.
    pub predecessor: Vec<i64>,
    pub peak_score: Vec<i32>,
    /// Last anchor that saw this one as its candidate's predecessor.
    pub pre_predecessor: Vec<i64>,
    pub used: Vec<bool>,
}

impl AnchorScoreTable {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            best_score: Vec::with_capacity(capacity),
            predecessor: Vec::with_capacity(capacity),
            peak_score: Vec::with_capacity(capacity),
            pre_predecessor: Vec::with_capacity(capacity),
            used: Vec::with_capacity(capacity),
        }
    }

    /// Size every array to `n` and restore initial values.
    pub fn reset(&mut self, n: usize) {
        self.best_score.clear();
        self.best_score.resize(n, 0);
        self.predecessor.clear();
        self.predecessor.resize(n, -1);
        self.peak_score.clear();
        self.peak_score.resize(n, 0);
        self.pre_predecessor.clear();
        self.pre_predecessor.resize(n, -1);
        self.used.clear();
        self.used.resize(n, false);
    }

    pub fn clear_used(&mut self) {
        self.used.iter_mut().for_each(|u| *u = false);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.best_score.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.best_score.is_empty()
    }
}
