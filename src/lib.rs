//! Seed-and-extend nucleotide similarity search.
//!
//! The library exposes the search pipeline
//! ([`pipelines::linear::orchestrator`]) and the building blocks under
//! [`core`]: aligners, scoring statistics, sequences and IO.

pub mod core;
pub mod defaults;
pub mod pipelines;
pub mod search_opt;
