// tests/extension_scenarios_test.rs
//
// Chain extension driven by a scripted aligner: the aligner replays a fixed
// list of results so the peak bookkeeping, restart-at-peak and gap costing
// can be checked without depending on a DP kernel.

use std::collections::VecDeque;

use ferrous_search::core::alignment::banded_swa::BandedSwaAligner;
use ferrous_search::core::alignment::{AlignMode, AlignResult, Aligner, AlignmentStatus};
use ferrous_search::core::error::AlignError;
use ferrous_search::core::stats::{GapScoring, KarlinScoring};
use ferrous_search::pipelines::linear::chaining::Chain;
use ferrous_search::pipelines::linear::finalization::{EditOp, Interval};
use ferrous_search::pipelines::linear::region::{
    extend_between_anchors, extend_chains, ExtensionContext,
};
use ferrous_search::pipelines::linear::seeding::Anchor;
use ferrous_search::search_opt::ExtensionParams;

/// Aligner replaying canned results; empty once the script runs out.
struct ScriptedAligner {
    script: VecDeque<AlignResult>,
    calls: Vec<(AlignMode, usize, usize)>,
}

impl ScriptedAligner {
    fn new(script: Vec<AlignResult>) -> Self {
        Self {
            script: script.into(),
            calls: Vec::new(),
        }
    }
}

impl Aligner for ScriptedAligner {
    fn align(&mut self, target: &[u8], query: &[u8], mode: AlignMode, _band: i32, _zdrop: i32) -> AlignResult {
        self.calls.push((mode, target.len(), query.len()));
        self.script.pop_front().unwrap_or_else(AlignResult::empty)
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

fn aligned(status: AlignmentStatus, cigar: Vec<(u8, u32)>, score: i32) -> AlignResult {
    AlignResult {
        status,
        cigar,
        score,
        max_query: -1,
        max_target: -1,
    }
}

fn scoring(db_letters: u64) -> KarlinScoring {
    KarlinScoring::new(2, -3, 5, 2, db_letters)
}

/// Three anchors of span 30 on the main diagonal, 70-base gaps between them.
fn three_anchor_chain() -> Chain {
    let mut chain = Chain::new(false);
    chain.anchors = vec![
        Anchor::from_start(200, 200, 30, 0),
        Anchor::from_start(100, 100, 30, 0),
        Anchor::from_start(0, 0, 30, 0),
    ];
    chain.score = 90;
    chain
}

#[test]
fn test_drop_below_peak_restarts_at_peak() {
    let query = vec![0u8; 300];
    let target = vec![0u8; 300];
    let scoring = scoring(300);
    let params = ExtensionParams::default();
    let ctx = ExtensionContext::new(&params, &scoring);
    let chain = three_anchor_chain();

    // The first gap drops with a net loss: 60 - 10 < peak 60
    let mut aligner = ScriptedAligner::new(vec![aligned(AlignmentStatus::Dropped, vec![(b'M', 10)], -10)]);
    let seg = extend_between_anchors(&mut aligner, &ctx, &chain, &query, &target, 2).unwrap();

    assert_eq!(seg.next_anchor_index, 1);
    assert_eq!(seg.hsp.score, 60);
    assert_eq!(seg.hsp.query_range, Interval::new(0, 30));
    assert_eq!(seg.hsp.subject_range, Interval::new(0, 30));
    assert_eq!(seg.hsp.transcript, vec![(30, EditOp::Match)]);

    // Global gap, then right extension from the peak anchor
    assert_eq!(aligner.calls.len(), 2);
    assert_eq!(aligner.calls[0], (AlignMode::Global, 70, 70));
    assert_eq!(aligner.calls[1].0, AlignMode::Right);
}

#[test]
fn test_drop_above_peak_is_reported_as_is() {
    let query = vec![0u8; 300];
    let target = vec![0u8; 300];
    let scoring = scoring(300);
    let params = ExtensionParams::default();
    let ctx = ExtensionContext::new(&params, &scoring);
    let chain = three_anchor_chain();

    let mut aligner = ScriptedAligner::new(vec![aligned(AlignmentStatus::Dropped, vec![(b'M', 10)], 20)]);
    let seg = extend_between_anchors(&mut aligner, &ctx, &chain, &query, &target, 2).unwrap();

    assert_eq!(seg.next_anchor_index, 1);
    assert_eq!(seg.hsp.score, 80);
    assert_eq!(seg.hsp.query_range, Interval::new(0, 40));
    // No right extension after an emitted drop
    assert_eq!(aligner.calls.len(), 1);
}

#[test]
fn test_work_list_resumes_after_drop() {
    let query = vec![0u8; 300];
    let target = vec![0u8; 300];
    let scoring = scoring(300);
    let params = ExtensionParams::default();
    let ctx = ExtensionContext::new(&params, &scoring);
    let chain = three_anchor_chain();

    let mut aligner = ScriptedAligner::new(vec![
        // walk 1: first gap drops, right extension from the peak
        aligned(AlignmentStatus::Dropped, vec![(b'M', 10)], -10),
        AlignResult::empty(),
        // walk 2: left extension, then a clean second gap
        AlignResult::empty(),
        aligned(AlignmentStatus::NotDropped, vec![(b'M', 70)], 140),
    ]);
    let hsps = extend_chains(&mut aligner, &ctx, 0.8, &[chain], &query, &query, &target).unwrap();

    assert_eq!(hsps.len(), 2);
    assert_eq!(hsps[0].query_range, Interval::new(0, 30));
    assert_eq!(hsps[0].score, 60);
    assert_eq!(hsps[1].query_range, Interval::new(100, 230));
    assert_eq!(hsps[1].subject_range, Interval::new(100, 230));
    assert_eq!(hsps[1].score, 260);
    assert_eq!(hsps[1].identities, 130);
}

#[test]
fn test_negative_gap_alignment_restarts_at_peak() {
    let query = vec![0u8; 300];
    let target = vec![0u8; 300];
    let scoring = scoring(300);
    let params = ExtensionParams::default();
    let ctx = ExtensionContext::new(&params, &scoring);
    let chain = three_anchor_chain();

    // 60 - 100 < 1: nothing is committed and the walk restarts at the peak
    let mut aligner = ScriptedAligner::new(vec![aligned(AlignmentStatus::NotDropped, vec![(b'M', 70)], -100)]);
    let seg = extend_between_anchors(&mut aligner, &ctx, &chain, &query, &target, 2).unwrap();
    assert_eq!(seg.next_anchor_index, 1);
    assert_eq!(seg.hsp.score, 60);
    assert_eq!(seg.hsp.query_range, Interval::new(0, 30));
}

#[test]
fn test_five_base_insertion_costs_fifteen() {
    // query = A[0..20] + 5 extra bases + B[0..20], target = A + B
    let a = b"ACGTTGCAACGTAGGCTAAC";
    let b = b"GGATCCATGCAAGTTCAGCA";
    let mut q = a.to_vec();
    q.extend_from_slice(b"TTTTT");
    q.extend_from_slice(b);
    let mut t = a.to_vec();
    t.extend_from_slice(b);
    let query = ferrous_search::core::sequence::Sequence::from_ascii(&q);
    let target = ferrous_search::core::sequence::Sequence::from_ascii(&t);

    let scoring = scoring(t.len() as u64);
    let params = ExtensionParams::default();
    let ctx = ExtensionContext::new(&params, &scoring);
    let mut aligner = BandedSwaAligner::new(GapScoring::from_model(&scoring));

    let mut chain = Chain::new(false);
    chain.anchors = vec![Anchor::from_start(25, 20, 20, 0), Anchor::from_start(0, 0, 20, 0)];
    chain.score = 30;

    let seg = extend_between_anchors(&mut aligner, &ctx, &chain, query.as_slice(), target.as_slice(), 1).unwrap();
    let hsp = seg.hsp;

    assert_eq!(seg.next_anchor_index, -1);
    assert_eq!(hsp.score, 2 * 40 - 15);
    assert_eq!(hsp.query_range, Interval::new(0, 45));
    assert_eq!(hsp.subject_range, Interval::new(0, 40));
    assert_eq!(
        hsp.transcript,
        vec![(20, EditOp::Match), (5, EditOp::Insertion), (20, EditOp::Match)]
    );
    assert_eq!(hsp.gap_openings, 1);
    assert_eq!(hsp.identities, 40);
}

#[test]
fn test_anchor_behind_previous_is_fatal() {
    let query = vec![0u8; 100];
    let target = vec![0u8; 100];
    let scoring = scoring(100);
    let params = ExtensionParams::default();
    let ctx = ExtensionContext::new(&params, &scoring);

    let mut chain = Chain::new(false);
    // Later anchor ends before the earlier one on the target
    chain.anchors = vec![Anchor::new(60, 25, 10, 0), Anchor::new(30, 30, 10, 0)];
    chain.score = 20;

    let mut aligner = ScriptedAligner::new(Vec::new());
    let err = extend_between_anchors(&mut aligner, &ctx, &chain, &query, &target, 1).unwrap_err();
    assert!(matches!(
        err,
        AlignError::UnmatchedAnchorOverlap {
            anchor_index: 1,
            query_distance: 30,
            target_distance: -5
        }
    ));
}

#[test]
fn test_malformed_aligner_output_is_fatal() {
    let query = vec![0u8; 300];
    let target = vec![0u8; 300];
    let scoring = scoring(300);
    let params = ExtensionParams::default();
    let ctx = ExtensionContext::new(&params, &scoring);

    let mut aligner = ScriptedAligner::new(vec![aligned(AlignmentStatus::NotDropped, vec![(b'S', 70)], 100)]);
    let err = extend_between_anchors(&mut aligner, &ctx, &three_anchor_chain(), &query, &target, 2).unwrap_err();
    assert_eq!(err, AlignError::MalformedCigar { symbol: 'S' });
}
