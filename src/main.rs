use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use conversion_by_channel::aggregate::ChannelAggregator;
use conversion_by_channel::intake;
use conversion_by_channel::models::ConversionBounds;
use conversion_by_channel::report;

#[derive(Parser)]
#[command(name = "conversion-by-channel")]
#[command(about = "Per-channel cumulative conversion summary with trend fit", long_about = None)]
struct Cli {
    /// Input CSV of weekly per-channel traffic records
    input: PathBuf,

    /// Write the report here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,

    /// Exclude channels whose overall signup conversion is at or below this
    #[arg(long, default_value_t = 0.0)]
    min_conversion: f64,

    /// Exclude channels whose overall signup conversion is at or above this
    #[arg(long, default_value_t = 1.0)]
    max_conversion: f64,

    /// Diagnostic logging (first-seen keys, ingest counts); never changes results
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let observations =
        intake::read_observations(&cli.input).context("failed to read observations")?;

    let mut aggregator = ChannelAggregator::new();
    for obs in observations {
        aggregator.ingest(obs);
    }
    info!(
        entries = aggregator.observation_count(),
        keys = aggregator.key_count(),
        "ingest complete"
    );

    let bounds = ConversionBounds {
        min: cli.min_conversion,
        max: cli.max_conversion,
    };
    let summaries = aggregator.finalize();
    let output = report::build_report(&summaries, &bounds);
    report::write_report(&output, cli.out.as_deref())?;

    Ok(())
}
