use crate::pipelines::linear::seeding::Anchor;

/// A co-linear run of anchors on one target.
///
/// Anchors are stored latest-in-query first: `anchors[0]` is the chain end,
/// `anchors.last()` the chain start.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub anchors: Vec<Anchor>,
    pub score: i32,
    pub target_id: u32,
    pub is_reverse: bool,
    pub mapping_quality: u8,
    pub is_primary: bool,
}

impl Chain {
    pub fn new(is_reverse: bool) -> Self {
        Self {
            anchors: Vec::new(),
            score: 0,
            target_id: 0,
            is_reverse,
            mapping_quality: 0,
            is_primary: false,
        }
    }

    #[inline]
    fn front(&self) -> &Anchor {
        &self.anchors[0]
    }

    #[inline]
    fn back(&self) -> &Anchor {
        &self.anchors[self.anchors.len() - 1]
    }

    pub fn query_start(&self) -> i32 {
        self.back().query_start()
    }

    pub fn query_end(&self) -> i32 {
        self.front().query_end
    }

    pub fn target_start(&self) -> i32 {
        self.back().target_start()
    }

    pub fn target_end(&self) -> i32 {
        self.front().target_end
    }

    pub fn query_span(&self) -> i32 {
        self.query_end() - self.query_start()
    }

    pub fn target_span(&self) -> i32 {
        self.target_end() - self.target_start()
    }

    /// Length of the shared query interval, negative if disjoint.
    pub fn overlap_in_query(&self, other: &Chain) -> i32 {
        self.query_end().min(other.query_end()) - self.query_start().max(other.query_start())
    }

    /// Length of the shared target interval, negative if disjoint.
    pub fn overlap_in_target(&self, other: &Chain) -> i32 {
        self.target_end().min(other.target_end()) - self.target_start().max(other.target_start())
    }

    /// Mapping quality from the best competing secondary score.
    ///
    /// `40 * (1 - secondary/score) * min(1, n_anchors/10) * ln(score)`,
    /// compressed from `[0, 312]` to `[0, 60]`.
    pub fn compute_mapping_quality(&mut self, secondary_score: i32) {
        if self.score <= 0 {
            self.mapping_quality = 0;
            return;
        }
        let ratio = secondary_score as f64 / self.score as f64;
        let anchor_term = (self.anchors.len() as f64 / 10.0).min(1.0);
        let quality = 40.0 * (1.0 - ratio) * anchor_term * (self.score as f64).ln();
        self.mapping_quality = (quality * 60.0 / 312.0).clamp(0.0, 60.0) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(anchors: Vec<Anchor>, score: i32) -> Chain {
        let mut c = Chain::new(false);
        c.anchors = anchors;
        c.score = score;
        c
    }

    #[test]
    fn test_spans_and_overlap() {
        let a = chain(
            vec![Anchor::new(200, 1200, 20, 0), Anchor::new(120, 1120, 20, 0)],
            80,
        );
        let b = chain(vec![Anchor::new(260, 300, 30, 0)], 30);
        assert_eq!(a.query_start(), 100);
        assert_eq!(a.query_span(), 100);
        assert_eq!(a.target_span(), 100);
        assert_eq!(a.overlap_in_query(&b), -30);
        assert_eq!(b.overlap_in_target(&a), -800);
    }

    #[test]
    fn test_mapping_quality_bounds() {
        let anchors: Vec<Anchor> = (0..12).map(|i| Anchor::new(100 + i * 50, 100 + i * 50, 20, 0)).collect();
        let mut unique = chain(anchors.clone(), 10_000);
        unique.compute_mapping_quality(0);
        // 40 * ln(10000) * 60 / 312 = 70.8, clamped
        assert_eq!(unique.mapping_quality, 60);

        let mut ambiguous = chain(anchors, 500);
        ambiguous.compute_mapping_quality(500);
        assert_eq!(ambiguous.mapping_quality, 0);

        let mut empty = chain(vec![Anchor::new(10, 10, 10, 0)], 0);
        empty.compute_mapping_quality(0);
        assert_eq!(empty.mapping_quality, 0);
    }
}
