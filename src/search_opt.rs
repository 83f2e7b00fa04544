use clap::Args;
use std::path::PathBuf;

use crate::core::alignment::{AlignerKind, AlignerLimits};
use crate::defaults;

/// Search options for the nucleotide chain-and-extend pipeline.
#[derive(Debug, Clone)]
pub struct SearchOpt {
    // Scoring parameters
    pub reward: i32,     // Match score
    pub penalty: i32,    // Mismatch penalty (positive)
    pub gap_open: i32,   // Gap open penalty
    pub gap_extend: i32, // Gap extension penalty

    // Seeding parameters
    pub kmer_size: usize,
    pub max_kmer_occurrences: usize, // Drop k-mers occurring more often than this

    // Chaining parameters
    pub max_dist_x: i32,     // Max query gap between chained anchors
    pub max_dist_y: i32,     // Max target gap between chained anchors
    pub chain_band_width: i32, // Max diagonal drift between chained anchors
    pub max_skip: i32,
    pub max_iterations: i32,
    pub chain_pen_gap: f32,
    pub chain_pen_skip: f32,
    pub min_chain_score: i32,
    pub map_percentage_target: f64,
    pub min_overlap_percentage_secondary: f64,
    pub max_overlap_extension: f32,
    pub chain_fraction_align: f64,
    pub keep_best_chains_per_target: bool,

    // Extension parameters. `None` falls back to the aligner's own limits.
    pub aligner: AlignerKind,
    pub band_extension: Option<i32>,
    pub zdrop_extension: Option<i32>,
    pub band_global: Option<i32>,
    pub zdrop_global: Option<i32>,

    // Output parameters
    pub max_evalue: f64,
    pub best_hsp_only: bool,
    pub chaining_output_only: bool, // Report chains as HSPs without gapped extension

    pub verbosity: u8,
}

// ============================================================================
// STAGE-SPECIFIC PARAMETER BUNDLES
// ============================================================================

/// Parameters for the chaining stage
#[derive(Debug, Clone, PartialEq)]
pub struct ChainingParameters {
    pub max_dist_x: i32,
    pub max_dist_y: i32,
    pub band_width: i32,
    pub max_skip: i32,
    pub max_iterations: i32,
    pub map_percentage_target: f64,
    pub min_chain_score: i32,
    pub chain_pen_gap: f32,
    pub chain_pen_skip: f32,
    pub max_overlap_extension: f32,
    pub min_overlap_percentage_secondary: f64,
}

impl Default for ChainingParameters {
    fn default() -> Self {
        SearchOpt::default().chaining_params()
    }
}

/// Parameters for the extension stage
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionParams {
    pub aligner: AlignerKind,
    pub band_extension: i32,
    pub band_global: i32,
    pub zdrop_extension: i32,
    pub zdrop_global: i32,
    pub max_evalue: f64,
    pub best_hsp_only: bool,
    pub chaining_output_only: bool,
    pub chain_fraction_align: f64,
    pub keep_best_chains_per_target: bool,
}

impl Default for ExtensionParams {
    fn default() -> Self {
        SearchOpt::default().extension_params()
    }
}

#[derive(Debug, Clone, Args)]
pub struct SearchCliOptions {
    /// Target sequences (FASTA, optionally gzip/BGZF compressed)
    #[arg(short = 'd', long, value_name = "DB.FA")]
    pub db: PathBuf,

    /// Query sequences (FASTA, optionally gzip/BGZF compressed)
    #[arg(short = 'q', long, value_name = "QUERY.FA")]
    pub query: PathBuf,

    /// Output tabular file (default: stdout)
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    // ===== Scoring Options =====
    /// Score for a match
    #[arg(long, value_name = "INT", default_value_t = defaults::REWARD)]
    pub reward: i32,

    /// Penalty for a mismatch
    #[arg(long, value_name = "INT", default_value_t = defaults::PENALTY)]
    pub penalty: i32,

    /// Gap open penalty; a gap of size k costs '{--gap-open} + {--gap-extend}*k'
    #[arg(long, value_name = "INT", default_value_t = defaults::GAP_OPEN)]
    pub gap_open: i32,

    /// Gap extension penalty
    #[arg(long, value_name = "INT", default_value_t = defaults::GAP_EXTEND)]
    pub gap_extend: i32,

    // ===== Seeding Options =====
    /// K-mer length for seed lookup
    #[arg(short = 'k', long, value_name = "INT", default_value_t = defaults::KMER_SIZE)]
    pub kmer_size: usize,

    /// Skip k-mers with more than INT occurrences in the database
    #[arg(long, value_name = "INT", default_value_t = defaults::MAX_KMER_OCCURRENCES)]
    pub max_kmer_occurrences: usize,

    // ===== Chaining Options =====
    /// Discard chains scoring below INT
    #[arg(long, value_name = "INT", default_value_t = defaults::MIN_CHAIN_SCORE)]
    pub min_chain_score: i32,

    /// Linear chaining penalty per base of diagonal drift
    #[arg(long, value_name = "FLOAT", default_value_t = defaults::CHAIN_PEN_GAP)]
    pub chain_pen_gap: f32,

    /// Linear chaining penalty per skipped base
    #[arg(long, value_name = "FLOAT", default_value_t = defaults::CHAIN_PEN_SKIP)]
    pub chain_pen_skip: f32,

    /// Skip chains overlapping an extended alignment by more than FLOAT of their span
    #[arg(long, value_name = "FLOAT", default_value_t = defaults::MAX_OVERLAP_EXTENSION)]
    pub max_overlap_extension: f32,

    /// Only extend chains scoring at least FLOAT times the best chain
    #[arg(long, value_name = "FLOAT", default_value_t = defaults::CHAIN_FRACTION_ALIGN)]
    pub chain_fraction_align: f64,

    /// Per target, keep only chains within 1% of that target's best chain
    #[arg(long)]
    pub keep_best_chains_per_target: bool,

    // ===== Extension Options =====
    /// Pairwise aligner: banded-swa or wfa
    #[arg(long, value_name = "STR", default_value = "banded-swa", value_parser = AlignerKind::parse)]
    pub aligner: AlignerKind,

    /// Band width for left/right extension [aligner default]
    #[arg(long, value_name = "INT")]
    pub band_extension: Option<i32>,

    /// Z-drop for left/right extension [aligner default]
    #[arg(long, value_name = "INT")]
    pub zdrop_extension: Option<i32>,

    /// Band width cap for gaps between anchors [aligner default]
    #[arg(long, value_name = "INT")]
    pub band_global: Option<i32>,

    /// Z-drop for gaps between anchors [aligner default]
    #[arg(long, value_name = "INT")]
    pub zdrop_global: Option<i32>,

    // ===== Output Options =====
    /// Maximum E-value to report
    #[arg(short = 'e', long, value_name = "FLOAT", default_value_t = defaults::MAX_EVALUE)]
    pub evalue: f64,

    /// Report only the best HSP per target
    #[arg(long)]
    pub best_hsp_only: bool,

    /// Report chains without gapped extension
    #[arg(long)]
    pub chaining_out: bool,

    /// Verbose level: 1=error, 2=warning, 3=message, 4=debug, 5+=trace
    #[arg(short = 'v', long, value_name = "INT", default_value_t = defaults::VERBOSITY)]
    pub verbosity: u8,

    // ===== Processing Options =====
    /// Number of threads (default: all available cores)
    #[arg(short = 't', long, value_name = "INT")]
    pub threads: Option<usize>,
}

impl Default for SearchOpt {
    fn default() -> Self {
        SearchOpt {
            // Scoring
            reward: defaults::REWARD,
            penalty: defaults::PENALTY,
            gap_open: defaults::GAP_OPEN,
            gap_extend: defaults::GAP_EXTEND,

            // Seeding
            kmer_size: defaults::KMER_SIZE,
            max_kmer_occurrences: defaults::MAX_KMER_OCCURRENCES,

            // Chaining
            max_dist_x: defaults::MAX_DIST_X,
            max_dist_y: defaults::MAX_DIST_Y,
            chain_band_width: defaults::CHAIN_BAND_WIDTH,
            max_skip: defaults::MAX_SKIP,
            max_iterations: defaults::MAX_ITERATIONS,
            chain_pen_gap: defaults::CHAIN_PEN_GAP,
            chain_pen_skip: defaults::CHAIN_PEN_SKIP,
            min_chain_score: defaults::MIN_CHAIN_SCORE,
            map_percentage_target: defaults::MAP_PERCENTAGE_TARGET,
            min_overlap_percentage_secondary: defaults::MIN_OVERLAP_PERCENTAGE_SECONDARY,
            max_overlap_extension: defaults::MAX_OVERLAP_EXTENSION,
            chain_fraction_align: defaults::CHAIN_FRACTION_ALIGN,
            keep_best_chains_per_target: false,

            // Extension
            aligner: AlignerKind::default(),
            band_extension: None,
            zdrop_extension: None,
            band_global: None,
            zdrop_global: None,

            // Output
            max_evalue: defaults::MAX_EVALUE,
            best_hsp_only: false,
            chaining_output_only: false,

            verbosity: defaults::VERBOSITY,
        }
    }
}

impl SearchOpt {
    // ========================================================================
    // STAGE-SPECIFIC PARAMETER ACCESSORS
    // ========================================================================

    /// Get chaining-stage parameters as a bundle
    pub fn chaining_params(&self) -> ChainingParameters {
        ChainingParameters {
            max_dist_x: self.max_dist_x,
            max_dist_y: self.max_dist_y,
            band_width: self.chain_band_width,
            max_skip: self.max_skip,
            max_iterations: self.max_iterations,
            map_percentage_target: self.map_percentage_target,
            min_chain_score: self.min_chain_score,
            chain_pen_gap: self.chain_pen_gap,
            chain_pen_skip: self.chain_pen_skip,
            max_overlap_extension: self.max_overlap_extension,
            min_overlap_percentage_secondary: self.min_overlap_percentage_secondary,
        }
    }

    /// Get extension-stage parameters as a bundle, resolving band and drop
    /// limits against the selected aligner
    pub fn extension_params(&self) -> ExtensionParams {
        let limits = self.aligner_limits();
        ExtensionParams {
            aligner: self.aligner,
            band_extension: limits.band_extension,
            band_global: limits.band_global,
            zdrop_extension: limits.zdrop_extension,
            zdrop_global: limits.zdrop_global,
            max_evalue: self.max_evalue,
            best_hsp_only: self.best_hsp_only,
            chaining_output_only: self.chaining_output_only,
            chain_fraction_align: self.chain_fraction_align,
            keep_best_chains_per_target: self.keep_best_chains_per_target,
        }
    }

    pub fn aligner_limits(&self) -> AlignerLimits {
        let d = self.aligner.default_limits();
        AlignerLimits {
            band_extension: self.band_extension.unwrap_or(d.band_extension),
            zdrop_extension: self.zdrop_extension.unwrap_or(d.zdrop_extension),
            band_global: self.band_global.unwrap_or(d.band_global),
            zdrop_global: self.zdrop_global.unwrap_or(d.zdrop_global),
        }
    }

    /// Copy command-line values onto the options
    pub fn apply_cli(&mut self, cli: &SearchCliOptions) {
        self.reward = cli.reward;
        self.penalty = cli.penalty.abs();
        self.gap_open = cli.gap_open;
        self.gap_extend = cli.gap_extend;

        self.kmer_size = cli.kmer_size;
        self.max_kmer_occurrences = cli.max_kmer_occurrences;

        self.min_chain_score = cli.min_chain_score;
        self.chain_pen_gap = cli.chain_pen_gap;
        self.chain_pen_skip = cli.chain_pen_skip;
        self.max_overlap_extension = cli.max_overlap_extension;
        self.chain_fraction_align = cli.chain_fraction_align;
        self.keep_best_chains_per_target = cli.keep_best_chains_per_target;

        self.aligner = cli.aligner;
        self.band_extension = cli.band_extension;
        self.zdrop_extension = cli.zdrop_extension;
        self.band_global = cli.band_global;
        self.zdrop_global = cli.zdrop_global;

        self.max_evalue = cli.evalue;
        self.best_hsp_only = cli.best_hsp_only;
        self.chaining_output_only = cli.chaining_out;
        self.verbosity = cli.verbosity;
    }

    /// Validate parameters for consistency across stages
    /// Returns Ok(()) if valid, or Err with description of issues
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        // Scoring validation
        if self.reward < 1 {
            errors.push(format!("reward must be >= 1, got {}", self.reward));
        }
        if self.gap_open < 0 || self.gap_extend < 1 {
            errors.push(format!(
                "gap costs must be open >= 0 and extend >= 1, got {}/{}",
                self.gap_open, self.gap_extend
            ));
        }

        // Seeding validation
        if self.kmer_size < 4 || self.kmer_size > 32 {
            errors.push(format!("kmer_size must be in [4, 32], got {}", self.kmer_size));
        }

        // Chaining validation
        if self.chain_band_width < 1 {
            errors.push(format!(
                "chain_band_width must be >= 1, got {}",
                self.chain_band_width
            ));
        }
        if !(0.0..=1.0).contains(&self.chain_fraction_align) {
            errors.push(format!(
                "chain_fraction_align must be in [0, 1], got {}",
                self.chain_fraction_align
            ));
        }
        if !(0.0..=1.0).contains(&self.max_overlap_extension) {
            errors.push(format!(
                "max_overlap_extension must be in [0, 1], got {}",
                self.max_overlap_extension
            ));
        }

        // Output validation
        if self.max_evalue <= 0.0 {
            errors.push(format!("max_evalue must be > 0, got {}", self.max_evalue));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
