//! link-harvest main entry point
//!
//! This is the command-line interface for running one batch of link downloads
//! under one or more concurrency strategies.

use anyhow::Context;
use clap::Parser;
use link_harvest::config::{load_config_with_hash, validate, Config};
use link_harvest::report::{print_summary, results_to_json, summary_line};
use link_harvest::runner::{create_run_dir, run_dir_path};
use link_harvest::{BatchResult, BatchRunner, Strategy};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// link-harvest: fetch every link on a page, under a choice of concurrency strategies
///
/// Fetches the seed page, takes the first link of every marked content block,
/// and downloads each linked resource into a timestamped output directory.
/// Individual download failures are reported in the summary; the exit status
/// is non-zero only if the seed page itself cannot be processed.
#[derive(Parser, Debug)]
#[command(name = "link-harvest")]
#[command(version)]
#[command(about = "Fetch linked resources under different concurrency strategies", long_about = None)]
struct Cli {
    /// Page whose content blocks link to the resources to fetch
    #[arg(value_name = "SEED_URL")]
    seed_url: String,

    /// Strategy to run (repeatable; defaults to the configured one)
    #[arg(short, long, value_enum, conflicts_with = "all")]
    strategy: Vec<Strategy>,

    /// Run every strategy against the same batch
    #[arg(long)]
    all: bool,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Worker count for the bounded pool
    #[arg(long)]
    pool_size: Option<usize>,

    /// Number of comparison rounds
    #[arg(long)]
    repeat: Option<u32>,

    /// Directory under which the per-run output directory is created
    #[arg(long, value_name = "DIR")]
    output_root: Option<PathBuf>,

    /// Print results as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Print a detailed summary for every run
    #[arg(long, conflicts_with = "json")]
    details: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_effective_config(&cli)?;
    let strategies = selected_strategies(&cli, &config);

    let output_root = PathBuf::from(&config.output.root);
    let started_at = chrono::Local::now();
    let output_dir = run_dir_path(&output_root, &started_at);

    let runner = BatchRunner::from_config(&config).context("Failed to set up batch runner")?;
    let job_set = runner
        .load_jobs(&cli.seed_url, &output_dir)
        .with_context(|| format!("Failed to extract links from {}", cli.seed_url))?;

    // Only a batch that loaded gets a run directory
    create_run_dir(&output_root, &started_at)?;

    let results = handle_comparison(&runner, &job_set, &strategies, &config, &cli);

    if cli.json {
        println!("{}", results_to_json(&results)?);
    }

    tracing::info!("Output written to {}", output_dir.display());
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("link_harvest=info,warn"),
            1 => EnvFilter::new("link_harvest=debug,info"),
            2 => EnvFilter::new("link_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(pool_size) = cli.pool_size {
        config.batch.pool_size = pool_size;
    }
    if let Some(repeat) = cli.repeat {
        config.batch.repeat = repeat;
    }
    if let Some(root) = &cli.output_root {
        config.output.root = root.display().to_string();
    }

    validate(&config).context("Invalid command-line override")?;
    Ok(config)
}

fn selected_strategies(cli: &Cli, config: &Config) -> Vec<Strategy> {
    if cli.all {
        Strategy::ALL.to_vec()
    } else if cli.strategy.is_empty() {
        vec![config.batch.strategy]
    } else {
        cli.strategy.clone()
    }
}

/// Runs every selected strategy `repeat` times against the same job set
fn handle_comparison(
    runner: &BatchRunner,
    job_set: &link_harvest::JobSet,
    strategies: &[Strategy],
    config: &Config,
    cli: &Cli,
) -> Vec<BatchResult> {
    let pause = Duration::from_millis(config.batch.pause_between_runs_ms);
    let mut results = Vec::new();

    for round in 0..config.batch.repeat {
        tracing::debug!("Comparison round {}", round + 1);

        for &strategy in strategies {
            if !results.is_empty() && !pause.is_zero() {
                std::thread::sleep(pause);
            }

            let result = runner.run(job_set, strategy);

            if cli.details {
                print_summary(&result);
            } else if !cli.json {
                println!("{}", summary_line(&result));
            }

            results.push(result);
        }
    }

    results
}
