// tests/chaining_integration_test.rs
//
// Chaining over anchor sets built through the public API: grouping, the DP,
// backtracking and the query-level filters.

use std::collections::HashSet;

use ferrous_search::core::sequence::{Sequence, TargetDb};
use ferrous_search::pipelines::linear::chaining::{
    chain_anchors, compute_score, filter_by_fraction_of_best, only_keep_best_chains_per_target,
    AnchorScoreTable, Chain,
};
use ferrous_search::pipelines::linear::finalization::detect_primary_chains;
use ferrous_search::pipelines::linear::seeding::{
    extend_seed_hits, group_anchors_by_target, Anchor, KmerIndex, SeedLookup,
};
use ferrous_search::search_opt::ChainingParameters;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Anchors with strictly increasing target ends, scattered over a few
/// diagonals so that several chains compete.
fn random_anchors(rng: &mut StdRng, n: usize, target_id: u32) -> Vec<Anchor> {
    let diagonals = [0i32, 40, -300, 900];
    (0..n)
        .map(|i| {
            let target_end = 30 * i as i32 + 40 + rng.gen_range(0..5);
            let diagonal = diagonals[rng.gen_range(0..diagonals.len())];
            let query_end = (target_end - diagonal + rng.gen_range(-3..=3)).max(25);
            Anchor::new(query_end, target_end, rng.gen_range(15..25), target_id)
        })
        .collect()
}

#[test]
fn test_chains_are_disjoint_and_ordered() {
    let params = ChainingParameters::default();
    let mut table = AnchorScoreTable::default();

    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut anchors = random_anchors(&mut rng, 200, 0);
        let groups = group_anchors_by_target(&mut anchors);
        assert_eq!(groups.len(), 1);

        let chains = chain_anchors(&params, &anchors[groups[0].range.clone()], &mut table, false, None);
        assert!(!chains.is_empty(), "seed {seed}: no chains");

        let mut seen = HashSet::new();
        for chain in &chains {
            assert!(chain.score >= params.min_chain_score);
            // anchors[0] is the latest anchor
            for pair in chain.anchors.windows(2) {
                assert!(pair[0].target_end > pair[1].target_end);
            }
            for a in &chain.anchors {
                assert!(seen.insert(a.target_end), "seed {seed}: anchor in two chains");
            }
        }
    }
}

#[test]
fn test_single_anchor_chain_scores_its_span() {
    let params = ChainingParameters::default();
    let mut table = AnchorScoreTable::default();
    let anchors = vec![Anchor::new(500, 1500, 64, 3)];

    let chains = chain_anchors(&params, &anchors, &mut table, true, None);
    assert_eq!(chains.len(), 1);
    assert_eq!(chains[0].score, 64);
    assert_eq!(chains[0].target_id, 3);
    assert!(chains[0].is_reverse);
    assert_eq!(chains[0].anchors, anchors);
}

#[test]
fn test_band_rejects_drifting_anchors() {
    let params = ChainingParameters::default();
    let earlier = Anchor::from_start(0, 0, 50, 0);
    // Drift of band_width + 1 between the two anchors
    let later = Anchor::from_start(100, 100 + params.band_width + 1, 50, 0);
    assert_eq!(compute_score(&later, &earlier, &params), None);

    let mut table = AnchorScoreTable::default();
    let chains = chain_anchors(&params, &[earlier, later], &mut table, false, None);
    assert_eq!(chains.len(), 2);
    assert!(chains.iter().all(|c| c.anchors.len() == 1));
}

#[test]
fn test_chain_limit_keeps_best_ends() {
    let params = ChainingParameters::default();
    let mut table = AnchorScoreTable::default();
    let mut rng = StdRng::seed_from_u64(99);
    let mut anchors = random_anchors(&mut rng, 300, 0);
    group_anchors_by_target(&mut anchors);

    let all = chain_anchors(&params, &anchors, &mut table, false, None);
    let limited = chain_anchors(&params, &anchors, &mut table, false, Some(4));
    assert!(limited.len() <= 4);
    assert!(limited.len() <= all.len());
    assert_eq!(limited[0].score, all[0].score);
}

#[test]
fn test_seeded_anchors_chain_per_target() {
    let mut rng = StdRng::seed_from_u64(5);
    let codes: Vec<u8> = (0..2000).map(|_| rng.gen_range(0..4u8)).collect();
    let mut db = TargetDb::new();
    db.push("a", Sequence::from_codes(codes[..1000].to_vec()));
    db.push("b", Sequence::from_codes(codes[1000..].to_vec()));

    // Query: 300 bases of each target, split by an N, with a substitution
    // in each piece
    let mut query = codes[200..500].to_vec();
    query.push(4);
    query.extend_from_slice(&codes[1400..1700]);
    query[150] = (query[150] + 1) % 4;
    query[451] = (query[451] + 1) % 4;

    let index = KmerIndex::build(&db, 15, 1000);
    let mut hits = index.lookup(&query);
    let mut anchors = extend_seed_hits(&mut hits, &query, &db);
    let groups = group_anchors_by_target(&mut anchors);
    assert_eq!(groups.len(), 2);

    let params = ChainingParameters::default();
    let mut table = AnchorScoreTable::default();
    let mut chains: Vec<Chain> = Vec::new();
    for g in &groups {
        chains.extend(chain_anchors(&params, &anchors[g.range.clone()], &mut table, false, None));
    }

    assert_eq!(chains.len(), 2);
    for chain in &chains {
        assert_eq!(chain.anchors.len(), 2);
        assert_eq!(chain.score, 150 + 149);
    }
    assert_eq!(chains[0].target_start(), 200);
    assert_eq!(chains[1].query_start(), 301);
    assert_eq!(chains[1].target_start(), 400);
}

#[test]
fn test_filters_and_classification() {
    fn chain(target_id: u32, query_start: i32, span: i32, score: i32) -> Chain {
        let mut c = Chain::new(false);
        c.target_id = target_id;
        c.score = score;
        c.anchors = vec![Anchor::from_start(query_start, 0, span, target_id)];
        c
    }

    let mut chains = vec![
        chain(0, 0, 500, 500),
        chain(1, 0, 500, 400),
        chain(1, 1000, 100, 100),
        chain(2, 2000, 100, 10),
    ];

    only_keep_best_chains_per_target(&mut chains, 0.99);
    assert_eq!(chains.len(), 3);

    chains.sort_by(|a, b| b.score.cmp(&a.score));
    filter_by_fraction_of_best(&mut chains, 0.1);
    assert_eq!(chains.iter().map(|c| c.score).collect::<Vec<_>>(), vec![500, 400]);

    // Both cover query [0, 500): the second is secondary to the first
    detect_primary_chains(&mut chains, 0.5);
    assert!(chains[0].is_primary);
    assert!(!chains[1].is_primary);
    let expected = (40.0 * (1.0 - 400.0 / 500.0) * 0.1 * 500f64.ln() * 60.0 / 312.0) as u8;
    assert_eq!(chains[0].mapping_quality, expected);
}
