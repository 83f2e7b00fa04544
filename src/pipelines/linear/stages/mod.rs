//! Pipeline stage abstraction layer
//!
//! This module defines the `PipelineStage` trait that the search stages
//! implement. A stage transforms one owned value into another, reading shared
//! state through a [`StageContext`] and reusing per-worker buffers through a
//! [`SearchWorkspace`].
//!
//! # Stage Pipeline
//!
//! ```text
//! query ─► Chaining (seed lookup, anchors, chains) ─► Extension (HSPs) ─► Vec<Match>
//! ```

pub mod chaining;
pub mod extension;

use std::fmt;

use crate::core::alignment::workspace::SearchWorkspace;
use crate::core::error::AlignError;
use crate::core::sequence::TargetDb;
use crate::core::stats::ScoringModel;
use crate::pipelines::linear::seeding::SeedLookup;
use crate::search_opt::SearchOpt;

/// Read-only state shared by all stages and all worker threads.
#[derive(Clone, Copy)]
pub struct StageContext<'a> {
    pub db: &'a TargetDb,
    pub lookup: &'a dyn SeedLookup,
    pub scoring: &'a dyn ScoringModel,
    pub opt: &'a SearchOpt,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StageError {
    /// The stage input violates a precondition.
    ValidationFailed(String),
    /// Extension hit a fatal alignment error.
    Alignment(AlignError),
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageError::ValidationFailed(msg) => write!(f, "Stage validation failed: {}", msg),
            StageError::Alignment(e) => write!(f, "Alignment failed: {}", e),
        }
    }
}

impl std::error::Error for StageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StageError::Alignment(e) => Some(e),
            StageError::ValidationFailed(_) => None,
        }
    }
}

impl From<AlignError> for StageError {
    fn from(e: AlignError) -> Self {
        StageError::Alignment(e)
    }
}

pub trait PipelineStage {
    type Input;
    type Output;

    fn process(
        &self,
        input: Self::Input,
        ctx: &StageContext,
        workspace: &mut SearchWorkspace,
    ) -> Result<Self::Output, StageError>;

    fn name(&self) -> &'static str;

    /// Check preconditions before `process`.
    fn validate(&self, _input: &Self::Input) -> Result<(), StageError> {
        Ok(())
    }
}
