//! Stage 1: Seed lookup and chaining
//!
//! Finds seeds for both strands of a query, grows them into anchors and
//! chains the anchors per target.
//!
//! # Algorithm Overview
//!
//! For the forward query and its reverse complement independently:
//! 1. Look up exact k-mer hits through the [`SeedLookup`](crate::pipelines::linear::seeding::SeedLookup)
//! 2. Extend hits into maximal exact-match anchors
//! 3. Group anchors by target, sorted by `(target_end, query_end)`
//! 4. Run the chaining recurrence and backtrack disjoint chains per group
//!
//! Chains from both strands are concatenated; `Chain::is_reverse` records
//! which strand a chain was built on.
//!
//! # Data Flow
//!
//! ```text
//! Input:  QueryStrands (forward + reverse-complement codes)
//! Output: ChainingOutput (Vec<Chain> + the strands, for extension)
//! ```

use super::{PipelineStage, StageContext, StageError};
use crate::core::alignment::workspace::SearchWorkspace;
use crate::core::sequence::Sequence;
use crate::core::utils::timer::Phase;
use crate::defaults::BEST_HSP_CHAIN_ENDS;
use crate::pipelines::linear::chaining::{chain_anchors, Chain};
use crate::pipelines::linear::seeding::{extend_seed_hits, group_anchors_by_target};

/// Both orientations of one query.
#[derive(Debug, Clone, Default)]
pub struct QueryStrands {
    pub forward: Sequence,
    pub reverse: Sequence,
}

impl QueryStrands {
    pub fn new(forward: Sequence) -> Self {
        let reverse = forward.reverse_complement();
        Self { forward, reverse }
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn strand(&self, is_reverse: bool) -> &Sequence {
        if is_reverse {
            &self.reverse
        } else {
            &self.forward
        }
    }
}

/// Output from the chaining stage.
#[derive(Debug, Clone, Default)]
pub struct ChainingOutput {
    pub chains: Vec<Chain>,
    pub strands: QueryStrands,
    /// Anchors built over both strands.
    pub num_anchors: usize,
}

impl ChainingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn num_chains(&self) -> usize {
        self.chains.len()
    }

    pub fn num_reverse_chains(&self) -> usize {
        self.chains.iter().filter(|c| c.is_reverse).count()
    }
}

/// Input to the chaining stage.
pub type ChainingInput = QueryStrands;

#[derive(Debug, Clone, Copy, Default)]
pub struct ChainingStage;

impl ChainingStage {
    pub fn new() -> Self {
        Self
    }

    fn chain_strand(
        &self,
        query: &Sequence,
        is_reverse: bool,
        ctx: &StageContext,
        ws: &mut SearchWorkspace,
    ) -> (Vec<Chain>, usize) {
        let mut hits = ws.timer.time(Phase::SeedLookup, || ctx.lookup.lookup(query.as_slice()));
        if hits.is_empty() {
            return (Vec::new(), 0);
        }

        let mut anchors = ws.timer.time(Phase::UngappedExtension, || {
            extend_seed_hits(&mut hits, query.as_slice(), ctx.db)
        });
        let num_anchors = anchors.len();

        let params = ctx.opt.chaining_params();
        let max_chain_ends = ctx.opt.best_hsp_only.then_some(BEST_HSP_CHAIN_ENDS);
        let table = &mut ws.score_table;
        let chains = ws.timer.time(Phase::Chaining, || {
            let groups = group_anchors_by_target(&mut anchors);
            let mut chains = Vec::new();
            for group in &groups {
                chains.extend(chain_anchors(
                    &params,
                    &anchors[group.range.clone()],
                    table,
                    is_reverse,
                    max_chain_ends,
                ));
            }
            chains
        });

        (chains, num_anchors)
    }
}

impl PipelineStage for ChainingStage {
    type Input = ChainingInput;
    type Output = ChainingOutput;

    fn process(
        &self,
        input: Self::Input,
        ctx: &StageContext,
        workspace: &mut SearchWorkspace,
    ) -> Result<Self::Output, StageError> {
        if input.is_empty() {
            return Ok(ChainingOutput::new());
        }

        let (mut chains, fwd_anchors) = self.chain_strand(&input.forward, false, ctx, workspace);
        let (reverse, rev_anchors) = self.chain_strand(&input.reverse, true, ctx, workspace);
        chains.extend(reverse);

        log::debug!(
            "ChainingStage: {} chains from {} anchors ({} forward, {} reverse)",
            chains.len(),
            fwd_anchors + rev_anchors,
            fwd_anchors,
            rev_anchors
        );

        Ok(ChainingOutput {
            chains,
            strands: input,
            num_anchors: fwd_anchors + rev_anchors,
        })
    }

    fn name(&self) -> &'static str {
        "Chaining"
    }

    fn validate(&self, input: &Self::Input) -> Result<(), StageError> {
        if input.forward.len() != input.reverse.len() {
            return Err(StageError::ValidationFailed(format!(
                "Query strands differ in length ({} vs {})",
                input.forward.len(),
                input.reverse.len()
            )));
        }
        if input.len() > i32::MAX as usize {
            return Err(StageError::ValidationFailed(format!(
                "Query length {} exceeds maximum supported length",
                input.len()
            )));
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
