mod batch;
mod statistics;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use geojson_simplify::io::{read_geojson, write_geojson};
use geojson_simplify::{simplify_collection_with_summary, BatchConfig, DEFAULT_TOLERANCE};
use std::path::PathBuf;
use std::time;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Parser)]
#[clap(
  name = "geojson_simplify",
  about = "Simplify GeoJSON boundary data for map rendering",
  version
)]
struct Cli {
  /// Verbose output
  #[clap(short, long, global = true)]
  verbose: bool,

  #[clap(subcommand)]
  command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
  #[clap(name = "simplify", about = "Simplify a single GeoJSON file")]
  Simplify {
    /// Input (.geojson, .json, optionally gzipped)
    #[clap(value_parser)]
    input: PathBuf,

    /// Output, gzipped when it ends in .gz
    #[clap(value_parser)]
    output: PathBuf,

    /// Maximum deviation, in coordinate units
    #[clap(short, long, value_parser, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,
  },

  #[clap(
    name = "batch",
    about = "Simplify every GeoJSON file in a directory into another directory"
  )]
  Batch {
    /// Batch configuration file
    #[clap(value_parser)]
    config: PathBuf,

    /// Input directory
    #[clap(value_parser)]
    input: PathBuf,

    /// Output directory
    #[clap(value_parser)]
    output: PathBuf,
  },

  #[clap(
    name = "stats",
    about = "Show how many points simplification removes, per geometry type"
  )]
  Stats {
    /// Input
    #[clap(value_parser)]
    input: PathBuf,

    /// Maximum deviation, in coordinate units
    #[clap(short, long, value_parser, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,
  },
}

fn setup_logging(verbose: bool) -> Result<()> {
  let level = if verbose { Level::DEBUG } else { Level::INFO };
  let subscriber = FmtSubscriber::builder()
    .with_max_level(level)
    .with_target(false)
    .finish();
  tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")
}

fn main() -> Result<()> {
  let args = Cli::parse();
  setup_logging(args.verbose)?;

  match args.command {
    Commands::Simplify {
      input,
      output,
      tolerance,
    } => {
      let started = time::Instant::now();
      let collection = read_geojson(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;
      let (simplified, summary) = simplify_collection_with_summary(&collection, tolerance);
      write_geojson(&output, &simplified)
        .with_context(|| format!("failed to write {}", output.display()))?;
      info!(
        "{} features ({} simplified), {} -> {} points in {}ms",
        summary.features,
        summary.simplified,
        summary.points_before,
        summary.points_after,
        started.elapsed().as_millis()
      );
    }
    Commands::Batch {
      config,
      input,
      output,
    } => {
      if !input.is_dir() {
        anyhow::bail!("Input directory {} does not exist", input.display());
      }
      let batch_config = BatchConfig::from_path(&config)
        .with_context(|| format!("failed to load config {}", config.display()))?;
      std::fs::create_dir_all(&output)
        .with_context(|| format!("failed to create {}", output.display()))?;

      let report = batch::batch(batch_config, input, output)?;
      if report.failed > 0 {
        anyhow::bail!("{} of {} files failed", report.failed, report.files + report.failed);
      }
    }
    Commands::Stats { input, tolerance } => {
      statistics::calculate_statistics(&input, tolerance)
        .with_context(|| format!("failed to read {}", input.display()))?
        .print_cli_table()?;
    }
  }
  Ok(())
}
