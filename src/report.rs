//! Report formatting: one CSV line per reportable channel.

use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use tracing::debug;

use crate::models::{ChannelSummary, ConversionBounds};

/// Formats one report line: the five key fields, whole-number totals, then
/// the six ratio/trend values at fixed 5-decimal precision. Field order and
/// precision are stable so identical inputs diff byte-for-byte.
pub fn format_line(summary: &ChannelSummary) -> String {
    format!(
        "{},{},{},{},{:.5},{:.5},{:.5},{:.5},{:.5},{:.5}",
        summary.key,
        summary.total_visits,
        summary.total_signups,
        summary.total_dna,
        summary.signup_conversion,
        summary.dna_conversion,
        summary.signup_trend.slope,
        summary.signup_trend.intercept,
        summary.dna_trend.slope,
        summary.dna_trend.intercept,
    )
}

/// Builds the full report: one line per summary passing the bounds filter,
/// in the summaries' own (first-seen) order. Channels failing the filter are
/// silently excluded; that is policy, not an error.
pub fn build_report(summaries: &[ChannelSummary], bounds: &ConversionBounds) -> String {
    let mut output = String::new();
    let mut emitted = 0usize;

    for summary in summaries {
        if !bounds.is_reportable(summary) {
            continue;
        }
        let _ = writeln!(output, "{}", format_line(summary));
        emitted += 1;
    }

    debug!(emitted, skipped = summaries.len() - emitted, "built report");
    output
}

/// Writes an already-built report to a file, or to stdout when no path is
/// given. Summaries are computed before this is called, so a sink failure
/// loses only the write, never the aggregation.
pub fn write_report(report: &str, out: Option<&Path>) -> anyhow::Result<()> {
    match out {
        Some(path) => std::fs::write(path, report)
            .with_context(|| format!("failed to write report to {}", path.display()))?,
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(report.as_bytes())
                .context("failed to write report to stdout")?;
        }
    }
    Ok(())
}
