//! Stage 2: Gapped extension
//!
//! Turns the chains of one query into scored HSPs grouped per target.
//!
//! # Algorithm Overview
//!
//! 1. Optionally keep only the near-best chains of every target
//! 2. In chaining-only mode, classify primaries and drop secondaries
//! 3. Drop chains below `chain_fraction_align` of the best chain
//! 4. Per target, in descending score order, either report the chains
//!    directly or extend them with the configured aligner
//!
//! # Data Flow
//!
//! ```text
//! Input:  ChainingOutput (chains of both strands + strands)
//! Output: ExtensionOutput (Vec<Match>, ascending target id)
//! ```

use super::chaining::ChainingOutput;
use super::{PipelineStage, StageContext, StageError};
use crate::core::alignment::workspace::SearchWorkspace;
use crate::core::alignment::AlignerKind;
use crate::core::utils::timer::Phase;
use crate::pipelines::linear::chaining::{
    filter_by_fraction_of_best, only_keep_best_chains_per_target, Chain,
};
use crate::pipelines::linear::finalization::{build_map_hsps, detect_primary_chains, Match};
use crate::pipelines::linear::region::{extend_chains, ExtensionContext};

/// Output from the extension stage.
#[derive(Debug, Clone, Default)]
pub struct ExtensionOutput {
    pub matches: Vec<Match>,
}

impl ExtensionOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn num_matches(&self) -> usize {
        self.matches.len()
    }

    pub fn num_hsps(&self) -> usize {
        self.matches.iter().map(|m| m.hsps.len()).sum()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionStage;

impl ExtensionStage {
    pub fn new() -> Self {
        Self
    }

    /// Apply the query-level chain filters and order chains by
    /// `(target_id, score desc)`.
    fn select_chains(&self, mut chains: Vec<Chain>, ctx: &StageContext) -> Vec<Chain> {
        let opt = ctx.opt;

        if opt.keep_best_chains_per_target {
            only_keep_best_chains_per_target(&mut chains, opt.map_percentage_target);
        }
        chains.sort_by(|a, b| b.score.cmp(&a.score));

        if opt.chaining_output_only {
            detect_primary_chains(&mut chains, opt.min_overlap_percentage_secondary);
            chains.retain(|c| c.is_primary);
        }

        filter_by_fraction_of_best(&mut chains, opt.chain_fraction_align);
        chains.sort_by(|a, b| a.target_id.cmp(&b.target_id).then(b.score.cmp(&a.score)));
        chains
    }
}

impl PipelineStage for ExtensionStage {
    type Input = ChainingOutput;
    type Output = ExtensionOutput;

    fn process(
        &self,
        input: Self::Input,
        ctx: &StageContext,
        workspace: &mut SearchWorkspace,
    ) -> Result<Self::Output, StageError> {
        if input.is_empty() {
            return Ok(ExtensionOutput::new());
        }

        let query_len = input.strands.len();
        let chains = self.select_chains(input.chains, ctx);
        let params = ctx.opt.extension_params();
        let ext_ctx = ExtensionContext::new(&params, ctx.scoring);
        let max_overlap = ctx.opt.max_overlap_extension;

        let mut matches = Vec::new();
        let mut begin = 0;
        while begin < chains.len() {
            let target_id = chains[begin].target_id;
            let end = begin + chains[begin..].iter().take_while(|c| c.target_id == target_id).count();
            let group = &chains[begin..end];
            begin = end;

            let hsps = if params.chaining_output_only {
                workspace
                    .timer
                    .time(Phase::HspBuild, || build_map_hsps(group, query_len, ctx.scoring))
            } else {
                let target = ctx.db.get(target_id as usize).as_slice();
                let forward = input.strands.forward.as_slice();
                let reverse = input.strands.reverse.as_slice();
                let SearchWorkspace {
                    kind,
                    banded,
                    wavefront,
                    timer,
                    ..
                } = workspace;
                timer.time(Phase::Extension, || match kind {
                    AlignerKind::BandedSwa => {
                        extend_chains(banded, &ext_ctx, max_overlap, group, forward, reverse, target)
                    }
                    AlignerKind::Wavefront => {
                        extend_chains(wavefront, &ext_ctx, max_overlap, group, forward, reverse, target)
                    }
                })?
            };

            if !hsps.is_empty() {
                let mut m = Match::new(target_id);
                m.hsps = hsps;
                matches.push(m);
            }
        }

        log::debug!(
            "ExtensionStage: {} matches, {} HSPs from {} chains",
            matches.len(),
            matches.iter().map(|m| m.hsps.len()).sum::<usize>(),
            chains.len()
        );

        Ok(ExtensionOutput { matches })
    }

    fn name(&self) -> &'static str {
        "Extension"
    }

    fn validate(&self, input: &Self::Input) -> Result<(), StageError> {
        if let Some(chain) = input.chains.iter().find(|c| c.anchors.is_empty()) {
            return Err(StageError::ValidationFailed(format!(
                "Chain on target {} has no anchors",
                chain.target_id
            )));
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
