//! Linear search pipeline.
//!
//! Finds local alignments of nucleotide queries against a set of targets:
//! exact k-mer seeds are grown into anchors, anchors are chained per target,
//! and chains are extended into scored HSPs.
//!
//! # Module Organization
//!
//! - `seeding/` - seed lookup, anchors and per-target grouping
//! - `chaining/` - chaining DP, backtracking and chain filters
//! - `region/` - extension of chains into gapped alignments
//! - `finalization/` - HSP assembly, primary/secondary classification
//! - `stages/` - the `ChainingStage` and `ExtensionStage` pipeline stages
//! - `orchestrator/` - per-query driver and the parallel query loop
//!
//! # Entry Point
//!
//! [`orchestrator::extend_query`] for one query, or
//! [`orchestrator::search_queries`] for a query set.

pub mod chaining;
pub mod finalization;
pub mod orchestrator;
pub mod region;
pub mod seeding;
pub mod stages;
