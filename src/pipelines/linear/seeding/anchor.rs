/// Start of an exact k-mer match between the query and one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeedHit {
    pub query_pos: i32,
    pub target_id: u32,
    pub target_pos: i32,
}

impl SeedHit {
    #[inline]
    pub fn diagonal(&self) -> i32 {
        self.target_pos - self.query_pos
    }
}

/// An exact-match segment shared by query and target.
///
/// Positions are stored as exclusive ends; the segment covers
/// `[query_end - span, query_end)` in the query and
/// `[target_end - span, target_end)` in the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Anchor {
    pub query_end: i32,
    pub target_end: i32,
    pub span: i32,
    pub target_id: u32,
}

impl Anchor {
    pub fn new(query_end: i32, target_end: i32, span: i32, target_id: u32) -> Self {
        Self {
            query_end,
            target_end,
            span,
            target_id,
        }
    }

    /// Build from start positions.
    pub fn from_start(query_start: i32, target_start: i32, span: i32, target_id: u32) -> Self {
        Self::new(query_start + span, target_start + span, span, target_id)
    }

    #[inline]
    pub fn query_start(&self) -> i32 {
        self.query_end - self.span
    }

    #[inline]
    pub fn target_start(&self) -> i32 {
        self.target_end - self.span
    }

    #[inline]
    pub fn diagonal(&self) -> i32 {
        self.target_end - self.query_end
    }
}
