//! Per-phase wall clock accounting for the search pipeline.
//!
//! Every worker owns an `ExtensionTimer` inside its workspace. Timers are
//! folded into a shared total with [`ExtensionTimer::merge_from`], which also
//! zeroes the source so it can keep accumulating for the next query.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    SeedLookup,
    UngappedExtension,
    Chaining,
    Extension,
    HspBuild,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionTimer {
    pub seed_lookup: Duration,
    pub ungapped_extension: Duration,
    pub chaining: Duration,
    pub extension: Duration,
    pub hsp_build: Duration,
}

impl ExtensionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, phase: Phase, elapsed: Duration) {
        match phase {
            Phase::SeedLookup => self.seed_lookup += elapsed,
            Phase::UngappedExtension => self.ungapped_extension += elapsed,
            Phase::Chaining => self.chaining += elapsed,
            Phase::Extension => self.extension += elapsed,
            Phase::HspBuild => self.hsp_build += elapsed,
        }
    }

    /// Run `f`, charging its wall time to `phase`.
    pub fn time<T>(&mut self, phase: Phase, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        self.update(phase, start.elapsed());
        out
    }

    /// Add `other` into `self` and reset `other`.
    pub fn merge_from(&mut self, other: &mut ExtensionTimer) {
        self.seed_lookup += other.seed_lookup;
        self.ungapped_extension += other.ungapped_extension;
        self.chaining += other.chaining;
        self.extension += other.extension;
        self.hsp_build += other.hsp_build;
        *other = ExtensionTimer::default();
    }

    pub fn total(&self) -> Duration {
        self.seed_lookup + self.ungapped_extension + self.chaining + self.extension + self.hsp_build
    }

    pub fn log_summary(&self) {
        log::info!("Phase timings (summed over worker threads):");
        log::info!("  Seed lookup:        {:.3}s", self.seed_lookup.as_secs_f64());
        log::info!("  Ungapped extension: {:.3}s", self.ungapped_extension.as_secs_f64());
        log::info!("  Chaining:           {:.3}s", self.chaining.as_secs_f64());
        log::info!("  Extension:          {:.3}s", self.extension.as_secs_f64());
        log::info!("  HSP build:          {:.3}s", self.hsp_build.as_secs_f64());
    }
}
