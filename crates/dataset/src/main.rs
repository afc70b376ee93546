//! Batch dataset builder: one `_UP` / `_DOWN` matrix pair per trading
//! day, days processed in parallel.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use rayon::prelude::*;
use tracing::{error, info, warn};

use lob_core::config::AppConfig;
use lob_core::logging::init_tracing;
use lob_dataset::{assemble, parser, BuildOptions, DatasetError, DatasetWriter};

#[derive(Parser, Debug)]
#[command(name = "lob-dataset", about = "Build one-second order-book training matrices")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Month component of the day files to process.
    #[arg(long)]
    month: u32,

    /// Comma-delimited day-of-month list, e.g. `2,3,6,7`.
    #[arg(long)]
    days: String,

    /// Override the configured input directory.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Override the configured output directory.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Override the configured year.
    #[arg(long)]
    year: Option<u32>,

    /// Override the forward labeling horizon, in seconds.
    #[arg(long)]
    horizon: Option<u32>,

    /// Emit JSON-formatted logs.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.json);

    let mut cfg = AppConfig::load(args.config.clone())?;
    if let Some(dir) = args.data_dir {
        cfg.data.input_dir = dir;
    }
    if let Some(dir) = args.out_dir {
        cfg.data.output_dir = dir;
    }
    if let Some(year) = args.year {
        cfg.data.year = year;
    }
    if let Some(horizon) = args.horizon {
        cfg.features.horizon_secs = horizon;
    }
    // Overrides bypass the load-time check; validate the merged result.
    cfg.validate()?;

    let days = parse_days(&args.days)?;

    if cfg.runtime.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cfg.runtime.threads)
            .build_global()
            .context("failed to size the worker pool")?;
    }

    std::fs::create_dir_all(&cfg.data.output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            cfg.data.output_dir.display()
        )
    })?;

    let writer = DatasetWriter::new(&cfg.data.output_dir);
    let opts = BuildOptions {
        horizon_secs: cfg.features.horizon_secs,
        substitute_zero_prices: cfg.features.substitute_zero_prices,
    };

    info!(
        year = cfg.data.year,
        month = args.month,
        days = days.len(),
        horizon_secs = opts.horizon_secs,
        "starting batch build"
    );

    let built = days
        .par_iter()
        .filter(|&&day| {
            process_day(
                &writer,
                &cfg.data.input_dir,
                cfg.data.year,
                args.month,
                day,
                &opts,
            )
        })
        .count();

    if built == 0 {
        bail!("no day produced output (of {} requested)", days.len());
    }
    info!(built, requested = days.len(), "batch build finished");
    Ok(())
}

/// Build and write one day. Missing input files are skipped with a
/// warning; any other failure is logged and the day is dropped.
fn process_day(
    writer: &DatasetWriter,
    input_dir: &Path,
    year: u32,
    month: u32,
    day: u32,
    opts: &BuildOptions,
) -> bool {
    let path = input_dir.join(parser::day_file_name(year, month, day));
    let result = assemble::build_day(&path, opts)
        .and_then(|dataset| writer.write_day(year, month, day, &dataset));
    match result {
        Ok((up, down)) => {
            info!(up = %up.display(), down = %down.display(), "day complete");
            true
        }
        Err(DatasetError::MissingFile { path }) => {
            warn!(path = %path.display(), "day file missing, skipped");
            false
        }
        Err(err) => {
            error!(year, month, day, %err, "day failed");
            false
        }
    }
}

/// Parse a comma-delimited day-of-month list.
fn parse_days(spec: &str) -> Result<Vec<u32>> {
    let days: Vec<u32> = spec
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>()
                .with_context(|| format!("invalid day-of-month {s:?}"))
        })
        .collect::<Result<_>>()?;
    if days.is_empty() {
        bail!("--days must name at least one day");
    }
    Ok(days)
}
