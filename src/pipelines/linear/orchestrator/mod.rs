//! Pipeline orchestration layer
//!
//! Runs the stages for one query ([`extend_query`]) and fans a query set out
//! over the rayon pool ([`search_queries`]).
//!
//! # Pipeline Flow
//!
//! ```text
//! Query → Chaining (seed lookup, anchors, chains) → Extension → Vec<Match>
//! ```
//!
//! Each rayon worker owns one [`SearchWorkspace`], created lazily by
//! `map_init`. Everything else (target database, seed index, scoring model,
//! options) is shared read-only. Run-wide counters live in [`SearchStats`].

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use rayon::prelude::*;

use crate::core::alignment::workspace::SearchWorkspace;
use crate::core::sequence::{Query, Sequence, TargetDb};
use crate::core::stats::{GapScoring, ScoringModel};
use crate::core::utils::timer::ExtensionTimer;
use crate::pipelines::linear::finalization::Match;
use crate::pipelines::linear::seeding::SeedLookup;
use crate::pipelines::linear::stages::chaining::{ChainingStage, QueryStrands};
use crate::pipelines::linear::stages::extension::ExtensionStage;
use crate::pipelines::linear::stages::{PipelineStage, StageContext, StageError};
use crate::search_opt::SearchOpt;

/// Search one query against every target.
///
/// Returns the matches ordered by target id; each match holds at least one
/// HSP. A fatal alignment error aborts the query.
pub fn extend_query(
    query: &Sequence,
    db: &TargetDb,
    lookup: &dyn SeedLookup,
    scoring: &dyn ScoringModel,
    opt: &SearchOpt,
    workspace: &mut SearchWorkspace,
) -> Result<Vec<Match>, StageError> {
    let ctx = StageContext {
        db,
        lookup,
        scoring,
        opt,
    };

    let chainer = ChainingStage::new();
    let extender = ExtensionStage::new();

    let strands = QueryStrands::new(query.clone());
    chainer.validate(&strands)?;
    let chaining_output = chainer.process(strands, &ctx, workspace)?;
    if chaining_output.is_empty() {
        return Ok(Vec::new());
    }

    extender.validate(&chaining_output)?;
    let extension_output = extender.process(chaining_output, &ctx, workspace)?;
    Ok(extension_output.matches)
}

/// Counters shared by all workers of one run.
pub struct SearchStats {
    pub timer: Mutex<ExtensionTimer>,
    pub queries_aligned: AtomicUsize,
    pub targets_aligned: Vec<AtomicBool>,
}

impl SearchStats {
    pub fn new(num_targets: usize) -> Self {
        Self {
            timer: Mutex::new(ExtensionTimer::new()),
            queries_aligned: AtomicUsize::new(0),
            targets_aligned: (0..num_targets).map(|_| AtomicBool::new(false)).collect(),
        }
    }

    fn record(&self, matches: &[Match]) {
        if matches.is_empty() {
            return;
        }
        self.queries_aligned.fetch_add(1, Ordering::Relaxed);
        for m in matches {
            if let Some(flag) = self.targets_aligned.get(m.target_id as usize) {
                flag.store(true, Ordering::Relaxed);
            }
        }
    }

    fn merge_timer(&self, worker: &mut ExtensionTimer) {
        let mut total = match self.timer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        total.merge_from(worker);
    }

    pub fn num_queries_aligned(&self) -> usize {
        self.queries_aligned.load(Ordering::Relaxed)
    }

    pub fn num_targets_aligned(&self) -> usize {
        self.targets_aligned
            .iter()
            .filter(|t| t.load(Ordering::Relaxed))
            .count()
    }

    /// Log the totals and the per-phase timings.
    pub fn log_summary(&self) {
        log::info!("{}", self);
        match self.timer.lock() {
            Ok(timer) => timer.log_summary(),
            Err(poisoned) => poisoned.into_inner().log_summary(),
        }
    }
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} queries aligned, {}/{} targets hit",
            self.num_queries_aligned(),
            self.num_targets_aligned(),
            self.targets_aligned.len()
        )
    }
}

/// Search every query in parallel.
///
/// The result is in query order. The first fatal error stops the run.
pub fn search_queries(
    queries: &[Query],
    db: &TargetDb,
    lookup: &dyn SeedLookup,
    scoring: &dyn ScoringModel,
    opt: &SearchOpt,
    stats: &SearchStats,
) -> Result<Vec<Vec<Match>>, StageError> {
    let gap = GapScoring::from_model(scoring);
    let kind = opt.aligner;

    log::debug!(
        "Searching {} queries against {} targets with {}",
        queries.len(),
        db.len(),
        kind.name()
    );

    queries
        .par_iter()
        .map_init(
            || SearchWorkspace::new(kind, gap),
            |ws, query| {
                let matches = extend_query(&query.sequence, db, lookup, scoring, opt, ws)?;
                stats.record(&matches);
                stats.merge_timer(&mut ws.timer);
                log::trace!("{}: {} matches", query.name, matches.len());
                Ok(matches)
            },
        )
        .collect()
}
