use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::time::Instant;

use ferrous_search::core::io::tabular_output::write_query_matches;
use ferrous_search::core::sequence::{read_queries, TargetDb};
use ferrous_search::core::stats::KarlinScoring;
use ferrous_search::pipelines::linear::orchestrator::{search_queries, SearchStats};
use ferrous_search::pipelines::linear::seeding::KmerIndex;
use ferrous_search::search_opt::{SearchCliOptions, SearchOpt};

#[derive(Parser)]
#[command(name = "ferrous-search")]
#[command(about = "FerrousSearch - seed-chain-extend search for nucleotide sequences", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search query sequences against a target database
    Search(SearchCliOptions),
}

fn init_logger(verbosity: u8) {
    // 1=error, 2=warning, 3=message, 4=debug, 5+=trace
    let log_level = match verbosity {
        v if v <= 1 => log::LevelFilter::Error,
        2 => log::LevelFilter::Warn,
        3 => log::LevelFilter::Info,
        4 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn configure_threads(threads: Option<usize>) -> anyhow::Result<usize> {
    let mut num_threads = threads.unwrap_or_else(num_cpus::get);

    if num_threads < 1 {
        log::warn!("Invalid thread count {}, using 1 thread", num_threads);
        num_threads = 1;
    }

    let max_threads = num_cpus::get() * 2;
    if num_threads > max_threads {
        log::warn!(
            "Thread count {} exceeds recommended maximum {}, capping at {}",
            num_threads,
            max_threads,
            max_threads
        );
        num_threads = max_threads;
    }

    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .context("Failed to configure thread pool")?;
    Ok(num_threads)
}

fn run_search(cli: &SearchCliOptions) -> anyhow::Result<()> {
    let mut opt = SearchOpt::default();
    opt.apply_cli(cli);
    if let Err(errors) = opt.validate() {
        for e in &errors {
            log::error!("{}", e);
        }
        bail!("{} invalid option(s)", errors.len());
    }

    let num_threads = configure_threads(cli.threads)?;
    log::info!("Using {} threads", num_threads);

    let start = Instant::now();
    let db = TargetDb::from_fasta(&cli.db)
        .with_context(|| format!("Failed to read target database {}", cli.db.display()))?;
    if db.is_empty() {
        bail!("Target database {} contains no sequences", cli.db.display());
    }
    let queries = read_queries(&cli.query)
        .with_context(|| format!("Failed to read queries {}", cli.query.display()))?;
    log::info!(
        "Loaded {} targets ({} letters) and {} queries in {:.2}s",
        db.len(),
        db.total_letters(),
        queries.len(),
        start.elapsed().as_secs_f64()
    );

    let index = KmerIndex::build(&db, opt.kmer_size, opt.max_kmer_occurrences);
    log::info!("Indexed {} distinct {}-mers", index.len(), opt.kmer_size);

    let scoring = KarlinScoring::new(
        opt.reward,
        -opt.penalty,
        opt.gap_open,
        opt.gap_extend,
        db.total_letters(),
    );

    let stats = SearchStats::new(db.len());
    let search_start = Instant::now();
    let results = search_queries(&queries, &db, &index, &scoring, &opt, &stats)
        .context("Search aborted")?;

    let mut writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let mut written = 0;
    for (query, matches) in queries.iter().zip(&results) {
        written += write_query_matches(&mut writer, &query.name, &db, matches)
            .context("Failed to write results")?;
    }
    writer.flush().context("Failed to flush output")?;

    log::info!(
        "Reported {} HSPs in {:.2}s",
        written,
        search_start.elapsed().as_secs_f64()
    );
    stats.log_summary();
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Search(options) => {
            init_logger(options.verbosity);
            if let Err(e) = run_search(&options) {
                log::error!("{:#}", e);
                std::process::exit(1);
            }
        }
    }
}
