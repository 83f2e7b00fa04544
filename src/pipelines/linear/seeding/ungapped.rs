use super::anchor::{Anchor, SeedHit};
use crate::core::sequence::TargetDb;

/// Grow raw seed hits into maximal exact-match anchors.
///
/// Hits are sorted by `(target, diagonal, query_pos)` so that all hits on one
/// diagonal are visited left to right. A hit that starts inside the anchor
/// just built on the same diagonal adds nothing and is skipped. Extension
/// stops at the first mismatch, at an `N`, or at either sequence end.
pub fn extend_seed_hits(hits: &mut [SeedHit], query: &[u8], db: &TargetDb) -> Vec<Anchor> {
    hits.sort_unstable_by_key(|h| (h.target_id, h.diagonal(), h.query_pos));

    let mut anchors = Vec::with_capacity(hits.len() / 4 + 1);
    let mut last: Option<(u32, i32, i32)> = None; // (target, diagonal, query_end)

    for hit in hits.iter() {
        let diagonal = hit.diagonal();
        if let Some((t, d, q_end)) = last {
            if t == hit.target_id && d == diagonal && hit.query_pos < q_end {
                continue;
            }
        }

        let target = db.get(hit.target_id as usize).as_slice();
        let (q_start, t_start, span) = extend_exact(query, target, hit.query_pos, hit.target_pos);
        if span <= 0 {
            continue;
        }

        let anchor = Anchor::from_start(q_start, t_start, span, hit.target_id);
        last = Some((hit.target_id, diagonal, anchor.query_end));
        anchors.push(anchor);
    }

    log::trace!("Built {} anchors from {} seed hits", anchors.len(), hits.len());
    anchors
}

/// Returns `(query_start, target_start, span)` of the maximal exact match
/// through `(qpos, tpos)`.
fn extend_exact(query: &[u8], target: &[u8], qpos: i32, tpos: i32) -> (i32, i32, i32) {
    let matches = |q: usize, t: usize| query[q] < 4 && query[q] == target[t];

    let (mut qs, mut ts) = (qpos as usize, tpos as usize);
    while qs > 0 && ts > 0 && matches(qs - 1, ts - 1) {
        qs -= 1;
        ts -= 1;
    }

    let (mut qe, mut te) = (qpos as usize, tpos as usize);
    while qe < query.len() && te < target.len() && matches(qe, te) {
        qe += 1;
        te += 1;
    }

    (qs as i32, ts as i32, (qe - qs) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sequence::Sequence;

    #[test]
    fn test_hits_on_one_diagonal_merge() {
        let mut db = TargetDb::new();
        db.push("t", Sequence::from_ascii(b"TTACGTACGTACGAA"));
        let query = Sequence::from_ascii(b"GACGTACGTACGC");

        // Three k-mer hits on diagonal +1 inside the same exact match
        let mut hits = vec![
            SeedHit { query_pos: 5, target_id: 0, target_pos: 6 },
            SeedHit { query_pos: 1, target_id: 0, target_pos: 2 },
            SeedHit { query_pos: 3, target_id: 0, target_pos: 4 },
        ];
        let anchors = extend_seed_hits(&mut hits, query.as_slice(), &db);
        assert_eq!(anchors.len(), 1);
        let a = anchors[0];
        assert_eq!(a.query_start(), 1);
        assert_eq!(a.target_start(), 2);
        assert_eq!(a.span, 11);
    }

    #[test]
    fn test_extension_stops_at_n() {
        let q = Sequence::from_ascii(b"ACGNACGT");
        let t = Sequence::from_ascii(b"ACGNACGT");
        assert_eq!(extend_exact(q.as_slice(), t.as_slice(), 5, 5), (4, 4, 4));
    }
}
