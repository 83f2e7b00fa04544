// tests/pipeline_integration_test.rs
//
// End-to-end searches through the public API: index a small database, run
// queries through extend_query / search_queries and check the HSPs.

use ferrous_search::core::alignment::workspace::SearchWorkspace;
use ferrous_search::core::alignment::AlignerKind;
use ferrous_search::core::sequence::{read_queries, Query, Sequence, TargetDb};
use ferrous_search::core::stats::{GapScoring, KarlinScoring, ScoringModel};
use ferrous_search::pipelines::linear::finalization::{Interval, Match, Strand};
use ferrous_search::pipelines::linear::orchestrator::{extend_query, search_queries, SearchStats};
use ferrous_search::pipelines::linear::seeding::KmerIndex;
use ferrous_search::search_opt::SearchOpt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Write;

fn random_codes(rng: &mut StdRng, len: usize) -> Vec<u8> {
    (0..len).map(|_| rng.gen_range(0..4u8)).collect()
}

fn substitute(codes: &mut [u8], positions: &[usize]) {
    for &p in positions {
        codes[p] = (codes[p] + 1) % 4;
    }
}

struct Fixture {
    db: TargetDb,
    index: KmerIndex,
    scoring: KarlinScoring,
}

impl Fixture {
    fn new(targets: Vec<Vec<u8>>, opt: &SearchOpt) -> Self {
        let mut db = TargetDb::new();
        for (i, codes) in targets.into_iter().enumerate() {
            db.push(format!("target{i}"), Sequence::from_codes(codes));
        }
        let index = KmerIndex::build(&db, opt.kmer_size, opt.max_kmer_occurrences);
        let scoring = KarlinScoring::new(opt.reward, opt.penalty, opt.gap_open, opt.gap_extend, db.total_letters());
        Self { db, index, scoring }
    }

    fn search(&self, query: &Sequence, opt: &SearchOpt) -> Vec<Match> {
        let mut ws = SearchWorkspace::new(opt.aligner, GapScoring::from_model(&self.scoring));
        extend_query(query, &self.db, &self.index, &self.scoring, opt, &mut ws).unwrap()
    }
}

#[test]
fn test_identical_1000bp_gives_single_full_hsp() {
    let mut rng = StdRng::seed_from_u64(7);
    let seq = random_codes(&mut rng, 1000);
    let opt = SearchOpt::default();
    let fx = Fixture::new(vec![seq.clone()], &opt);

    let matches = fx.search(&Sequence::from_codes(seq), &opt);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].target_id, 0);
    assert_eq!(matches[0].hsps.len(), 1);

    let hsp = &matches[0].hsps[0];
    assert_eq!(hsp.score, 2000);
    assert_eq!(hsp.query_range, Interval::new(0, 1000));
    assert_eq!(hsp.subject_range, Interval::new(0, 1000));
    assert_eq!(hsp.identities, 1000);
    assert_eq!(hsp.mismatches, 0);
    assert_eq!(hsp.gap_openings, 0);
    assert_eq!(hsp.strand, Strand::Forward);
    assert!(hsp.evalue < opt.max_evalue);
}

#[test]
fn test_substitutions_are_stitched_into_one_hsp() {
    let mut rng = StdRng::seed_from_u64(11);
    let target = random_codes(&mut rng, 1000);
    let mut query = target.clone();
    substitute(&mut query, &[250, 500, 750]);

    let opt = SearchOpt::default();
    let fx = Fixture::new(vec![target], &opt);
    let matches = fx.search(&Sequence::from_codes(query), &opt);

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].hsps.len(), 1);
    let hsp = &matches[0].hsps[0];
    assert_eq!(hsp.query_range, Interval::new(0, 1000));
    assert_eq!(hsp.mismatches, 3);
    assert_eq!(hsp.identities, 997);
    assert_eq!(hsp.score, 2 * 997 - 3 * 3);
}

#[test]
fn test_reverse_complement_query_hits_reverse_strand() {
    let mut rng = StdRng::seed_from_u64(13);
    let target = random_codes(&mut rng, 800);
    let opt = SearchOpt::default();
    let fx = Fixture::new(vec![target.clone()], &opt);

    // Query is the reverse complement of target[100..600)
    let query = Sequence::from_codes(target[100..600].to_vec()).reverse_complement();
    let matches = fx.search(&query, &opt);

    assert_eq!(matches.len(), 1);
    let hsp = &matches[0].hsps[0];
    assert_eq!(hsp.strand, Strand::Reverse);
    assert_eq!(hsp.subject_range, Interval::new(100, 600));
    assert_eq!(hsp.query_range, Interval::new(0, 500));
    assert_eq!(hsp.score, 1000);
}

#[test]
fn test_matches_are_ordered_by_target() {
    let mut rng = StdRng::seed_from_u64(17);
    let shared = random_codes(&mut rng, 400);
    let mut t0 = random_codes(&mut rng, 300);
    t0.extend_from_slice(&shared);
    let t1 = random_codes(&mut rng, 500);
    let mut t2 = shared.clone();
    t2.extend(random_codes(&mut rng, 200));

    let opt = SearchOpt::default();
    let fx = Fixture::new(vec![t0, t1, t2], &opt);
    let matches = fx.search(&Sequence::from_codes(shared), &opt);

    let targets: Vec<u32> = matches.iter().map(|m| m.target_id).collect();
    assert_eq!(targets, vec![0, 2]);
    assert_eq!(matches[0].hsps[0].subject_range, Interval::new(300, 700));
    assert_eq!(matches[1].hsps[0].subject_range, Interval::new(0, 400));
}

#[test]
fn test_chaining_output_only_reports_chains_with_mapq() {
    let mut rng = StdRng::seed_from_u64(19);
    let target = random_codes(&mut rng, 1000);
    let mut query = target[200..800].to_vec();
    substitute(&mut query, &[300]);

    let opt = SearchOpt {
        chaining_output_only: true,
        ..SearchOpt::default()
    };
    let fx = Fixture::new(vec![target], &opt);
    let matches = fx.search(&Sequence::from_codes(query), &opt);

    assert_eq!(matches.len(), 1);
    let hsp = &matches[0].hsps[0];
    assert_eq!(hsp.n_anchors, Some(2));
    assert!(hsp.mapping_quality.is_some());
    assert_eq!(hsp.query_range, Interval::new(0, 600));
    assert_eq!(hsp.subject_range, Interval::new(200, 800));
    assert_eq!(hsp.identities, 599);
    // Chain score, not an alignment score
    assert_eq!(hsp.score, 300 + 299);
}

#[test]
fn test_best_hsp_only_keeps_one_per_target() {
    let mut rng = StdRng::seed_from_u64(23);
    let block_a = random_codes(&mut rng, 300);
    let block_b = random_codes(&mut rng, 200);
    // Target holds the two blocks far apart and in swapped order
    let mut target = block_b.clone();
    target.extend(random_codes(&mut rng, 2000));
    target.extend_from_slice(&block_a);
    let mut query = block_a.clone();
    query.extend_from_slice(&block_b);

    let mut opt = SearchOpt::default();
    let fx = Fixture::new(vec![target], &opt);
    let all = fx.search(&Sequence::from_codes(query.clone()), &opt);
    assert_eq!(all[0].hsps.len(), 2);

    opt.best_hsp_only = true;
    let best = fx.search(&Sequence::from_codes(query), &opt);
    assert_eq!(best[0].hsps.len(), 1);
    assert_eq!(best[0].hsps[0].score, 600);
}

#[test]
fn test_search_is_deterministic_across_runs_and_aligners() {
    let mut rng = StdRng::seed_from_u64(29);
    let targets: Vec<Vec<u8>> = (0..4).map(|_| random_codes(&mut rng, 3000)).collect();
    let queries: Vec<Query> = (0..16)
        .map(|i| {
            let t = &targets[i % 4];
            let start = rng.gen_range(0..2000);
            let mut codes = t[start..start + 800].to_vec();
            let subs: Vec<usize> = (0..5).map(|_| rng.gen_range(0..800)).collect();
            substitute(&mut codes, &subs);
            Query {
                name: format!("q{i}"),
                sequence: Sequence::from_codes(codes),
            }
        })
        .collect();

    let opt = SearchOpt::default();
    let fx = Fixture::new(targets, &opt);

    let run = |opt: &SearchOpt| {
        let stats = SearchStats::new(fx.db.len());
        search_queries(&queries, &fx.db, &fx.index, &fx.scoring, opt, &stats).unwrap()
    };

    let first = run(&opt);
    let second = run(&opt);
    assert_eq!(first, second);
    for (i, matches) in first.iter().enumerate() {
        assert!(!matches.is_empty(), "query {i} found nothing");
        assert_eq!(matches[0].target_id as usize, i % 4);
    }

    let wfa = SearchOpt {
        aligner: AlignerKind::Wavefront,
        ..SearchOpt::default()
    };
    let third = run(&wfa);
    assert_eq!(third, run(&wfa));
}

#[test]
fn test_evalue_decreases_with_score() {
    let scoring = KarlinScoring::new(2, -3, 5, 2, 1_000_000);
    let mut last = f64::INFINITY;
    for score in [20, 40, 80, 160, 320] {
        let e = scoring.evalue(score, 1000);
        assert!(e < last, "evalue {} at score {} not below {}", e, score, last);
        last = e;
    }
}

#[test]
fn test_fasta_round_trip_search() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("db.fa");
    let query_path = dir.path().join("query.fa");

    let mut rng = StdRng::seed_from_u64(31);
    let codes = random_codes(&mut rng, 600);
    let ascii: String = codes.iter().map(|&c| b"ACGT"[c as usize] as char).collect();

    let mut f = std::fs::File::create(&db_path).unwrap();
    writeln!(f, ">chrA test target\n{}\n>chrB\n{}", ascii, "ACGT".repeat(50)).unwrap();
    let mut f = std::fs::File::create(&query_path).unwrap();
    writeln!(f, ">read1\n{}", &ascii[100..400]).unwrap();

    let db = TargetDb::from_fasta(&db_path).unwrap();
    let queries = read_queries(&query_path).unwrap();
    assert_eq!(db.len(), 2);
    assert_eq!(db.name(0), "chrA");
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].name, "read1");

    let opt = SearchOpt::default();
    let index = KmerIndex::build(&db, opt.kmer_size, opt.max_kmer_occurrences);
    let scoring = KarlinScoring::new(2, -3, 5, 2, db.total_letters());
    let stats = SearchStats::new(db.len());
    let results = search_queries(&queries, &db, &index, &scoring, &opt, &stats).unwrap();

    assert_eq!(results[0].len(), 1);
    assert_eq!(results[0][0].target_id, 0);
    assert_eq!(results[0][0].hsps[0].subject_range, Interval::new(100, 400));
    assert_eq!(stats.num_targets_aligned(), 1);
}
