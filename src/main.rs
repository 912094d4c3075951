use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use s2inventory::config::{MismatchPolicy, RuntimeConfig};
use s2inventory::inventory::PartitionOptions;
use s2inventory::{init_stores, init_tracing, split_days, SplitDaysRequest};
use std::path::PathBuf;

/// Partition Sentinel-2 inventory listings by acquisition date
#[derive(Parser)]
#[command(name = "s2inventory")]
#[command(version)]
#[command(about = "Partition Sentinel-2 inventory listings by acquisition date", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short = 'v', long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Split yesterday's inventory into one CSV per acquisition date
    SplitDays(SplitDaysArgs),
}

#[derive(Args)]
struct SplitDaysArgs {
    /// Sentinel-2 collection, e.g. l1c or l2a
    s2collection: String,

    /// Bucket where the per-date files are stored
    #[arg(long)]
    output_bucket: String,

    /// Prefix under which the per-date files are stored
    #[arg(long)]
    output_prefix: String,

    /// How many inventory files to process at a time
    #[arg(long)]
    threads: Option<usize>,

    /// Only process the first N inventory files
    #[arg(long)]
    take: Option<usize>,

    /// Process the inventory published the day before this date (default: today, UTC)
    #[arg(long, value_name = "YYYY-MM-DD")]
    run_date: Option<NaiveDate>,

    /// What to do with marker rows outside the tile date layout: skip or fail
    #[arg(long, value_name = "POLICY")]
    on_pattern_mismatch: Option<MismatchPolicy>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => RuntimeConfig::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => RuntimeConfig::load().context("Failed to load configuration")?,
    };

    if let Some(level) = &cli.log_level {
        config.log.level = level.clone();
    }
    init_tracing(&config.log);

    match cli.command {
        Commands::SplitDays(args) => run_split_days(config, args),
    }
}

fn run_split_days(mut config: RuntimeConfig, args: SplitDaysArgs) -> Result<()> {
    // CLI overrides (highest priority)
    if let Some(threads) = args.threads {
        config.run.threads = threads;
    }
    if let Some(policy) = args.on_pattern_mismatch {
        config.run.on_pattern_mismatch = policy;
    }
    config.validate()?;

    let request = SplitDaysRequest {
        collection: args.s2collection,
        output_prefix: args.output_prefix,
        threads: config.run.threads,
        take: args.take,
        run_date: args.run_date.unwrap_or_else(|| Utc::now().date_naive()),
        partition: PartitionOptions {
            marker_suffix: config.inventory.marker_suffix.clone(),
            on_pattern_mismatch: config.run.on_pattern_mismatch,
        },
    };

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?
        .block_on(async {
            let (source, sink) = init_stores(&config, &args.output_bucket)?;
            let summary = split_days(&source, &sink, &request).await?;
            println!("Took {} seconds", summary.elapsed.as_secs_f64());
            Ok::<(), anyhow::Error>(())
        })
}
