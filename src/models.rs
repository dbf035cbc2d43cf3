use std::fmt;

use chrono::{NaiveDate, NaiveTime};

use crate::trend::TrendLine;

/// One typed input row: a week of traffic for a single channel combination.
#[derive(Debug, Clone)]
pub struct Observation {
    pub week: NaiveDate,
    pub site: String,
    pub visit_country: String,
    pub entry_page: String,
    pub subtype: String,
    pub device: String,
    pub visits: u64,
    pub signups: u64,
    pub dna: u64,
}

impl Observation {
    /// Epoch seconds at midnight UTC for the observation's week.
    ///
    /// Only relative ordering and linear position matter to the trend fit,
    /// so the time-of-day choice is arbitrary but must be consistent.
    pub fn timestamp_secs(&self) -> i64 {
        self.week.and_time(NaiveTime::MIN).and_utc().timestamp()
    }

    /// Per-week signup ratio, 0.0 for a zero-visit week. Informational only;
    /// aggregation works on cumulative ratios.
    pub fn signup_conversion(&self) -> f64 {
        ratio(self.signups, self.visits)
    }

    /// Per-week DNA ratio, 0.0 for a zero-visit week.
    pub fn dna_conversion(&self) -> f64 {
        ratio(self.dna, self.visits)
    }

    pub fn key(&self) -> ChannelKey {
        ChannelKey {
            site: self.site.clone(),
            visit_country: self.visit_country.clone(),
            entry_page: self.entry_page.clone(),
            subtype: self.subtype.clone(),
            device: self.device.clone(),
        }
    }
}

pub(crate) fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Composite grouping key. Equality is exact string equality on all five
/// fields; every observation belongs to exactly one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelKey {
    pub site: String,
    pub visit_country: String,
    pub entry_page: String,
    pub subtype: String,
    pub device: String,
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{}",
            self.site, self.visit_country, self.entry_page, self.subtype, self.device
        )
    }
}

/// Final per-channel rollup produced by the aggregator.
#[derive(Debug, Clone)]
pub struct ChannelSummary {
    pub key: ChannelKey,
    pub total_visits: u64,
    pub total_signups: u64,
    pub total_dna: u64,
    pub signup_conversion: f64,
    pub dna_conversion: f64,
    pub signup_trend: TrendLine,
    pub dna_trend: TrendLine,
}

/// Open-interval validity filter on the overall signup conversion.
///
/// A channel converting at exactly 0% or 100% is treated as uninformative or
/// a data artifact and dropped from the report. The interval is configurable
/// rather than hard-coded.
#[derive(Debug, Clone, Copy)]
pub struct ConversionBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for ConversionBounds {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl ConversionBounds {
    /// A summary is reportable when it has any visits at all and its overall
    /// signup conversion falls strictly inside the interval.
    pub fn is_reportable(&self, summary: &ChannelSummary) -> bool {
        summary.total_visits > 0
            && summary.signup_conversion > self.min
            && summary.signup_conversion < self.max
    }
}
