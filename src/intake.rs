//! CSV intake: turns raw rows into typed [`Observation`]s.
//!
//! Expects a header row of
//! `week,site,visitcountry,entrypage,subtype,device,visits,signups,dna`
//! with weeks in `MM/DD/YYYY` form. Malformed rows fail the whole run here,
//! with line context, so the aggregator only ever sees well-typed records.

use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use tracing::debug;

use crate::models::Observation;

const WEEK_FORMAT: &str = "%m/%d/%Y";

#[derive(serde::Deserialize)]
struct RawRow {
    week: String,
    site: String,
    visitcountry: String,
    entrypage: String,
    subtype: String,
    device: String,
    visits: u64,
    signups: u64,
    dna: u64,
}

impl RawRow {
    fn into_observation(self) -> anyhow::Result<Observation> {
        let week = NaiveDate::parse_from_str(&self.week, WEEK_FORMAT)
            .with_context(|| format!("unparsable week {:?}, expected MM/DD/YYYY", self.week))?;

        Ok(Observation {
            week,
            site: self.site,
            visit_country: self.visitcountry,
            entry_page: self.entrypage,
            subtype: self.subtype,
            device: self.device,
            visits: self.visits,
            signups: self.signups,
            dna: self.dna,
        })
    }
}

/// Reads every row of the input CSV as an [`Observation`], in file order.
///
/// The file handle is dropped on every exit path, success or failure.
pub fn read_observations(path: &Path) -> anyhow::Result<Vec<Observation>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open input file {}", path.display()))?;

    let mut observations = Vec::new();
    for (index, result) in reader.deserialize::<RawRow>().enumerate() {
        // Header is line 1, first record line 2.
        let line = index + 2;
        let row = result.with_context(|| format!("malformed record at line {line}"))?;
        let obs = row
            .into_observation()
            .with_context(|| format!("malformed record at line {line}"))?;
        observations.push(obs);
    }

    debug!(
        count = observations.len(),
        path = %path.display(),
        "read observations"
    );
    Ok(observations)
}
