use std::ops::Range;

use super::anchor::Anchor;

/// Contiguous run of anchors that belong to one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorGroup {
    pub target_id: u32,
    pub range: Range<usize>,
}

impl AnchorGroup {
    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Sort anchors by `(target_id, target_end, query_end)` and split them into
/// per-target runs.
///
/// The sort is stable, so anchors equal in all three keys keep their input
/// order. Every anchor lands in exactly one group.
pub fn group_anchors_by_target(anchors: &mut [Anchor]) -> Vec<AnchorGroup> {
    anchors.sort_by_key(|a| (a.target_id, a.target_end, a.query_end));

    let mut groups = Vec::new();
    let mut begin = 0;
    for i in 1..=anchors.len() {
        if i == anchors.len() || anchors[i].target_id != anchors[begin].target_id {
            groups.push(AnchorGroup {
                target_id: anchors[begin].target_id,
                range: begin..i,
            });
            begin = i;
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouping_partitions_all_anchors() {
        let mut anchors = vec![
            Anchor::new(50, 500, 10, 2),
            Anchor::new(20, 30, 10, 0),
            Anchor::new(40, 400, 10, 2),
            Anchor::new(10, 15, 10, 0),
            Anchor::new(90, 95, 10, 1),
        ];
        let groups = group_anchors_by_target(&mut anchors);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups.iter().map(|g| g.len()).sum::<usize>(), 5);
        assert_eq!(groups[0].target_id, 0);
        assert_eq!(groups[0].range, 0..2);
        assert_eq!(anchors[0].target_end, 15);
        assert_eq!(groups[2].target_id, 2);
        assert_eq!(anchors[groups[2].range.start].target_end, 400);
    }

    #[test]
    fn test_grouping_empty() {
        let mut anchors: Vec<Anchor> = Vec::new();
        assert!(group_anchors_by_target(&mut anchors).is_empty());
    }
}
