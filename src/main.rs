use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use worddiff::{build_options, run_compare, Args};

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so the diff owns stdout.
    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let opts = build_options(&args)?;
    let report = run_compare(&args.old, &args.new, &opts)?;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(report.output.as_bytes())
        .context("Failed to write diff to stdout")?;
    stdout.flush()?;

    Ok(())
}
