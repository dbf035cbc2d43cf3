use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::debug;

use crate::models::{ratio, ChannelKey, ChannelSummary, Observation};
use crate::trend;

/// Running accumulator for one channel key.
///
/// The three vectors stay parallel: one entry per observation ingested, in
/// arrival order. Zero-visit weeks still append a 0.0 ratio point so the
/// trend series keeps its full length.
#[derive(Debug, Default)]
struct ChannelGroup {
    cumulative_visits: u64,
    cumulative_signups: u64,
    cumulative_dna: u64,
    timestamps: Vec<i64>,
    signup_ratios: Vec<f64>,
    dna_ratios: Vec<f64>,
}

impl ChannelGroup {
    fn push(&mut self, obs: &Observation) {
        self.cumulative_visits += obs.visits;
        self.cumulative_signups += obs.signups;
        self.cumulative_dna += obs.dna;
        self.timestamps.push(obs.timestamp_secs());
        self.signup_ratios
            .push(ratio(self.cumulative_signups, self.cumulative_visits));
        self.dna_ratios
            .push(ratio(self.cumulative_dna, self.cumulative_visits));
    }
}

/// Groups observations by channel key and derives per-channel summaries.
///
/// An owned value with an ingest/finalize lifecycle; separate runs never
/// share state. Keys are reported in first-seen order, which makes output
/// deterministic for a given input order.
#[derive(Debug, Default)]
pub struct ChannelAggregator {
    groups: HashMap<ChannelKey, ChannelGroup>,
    key_order: Vec<ChannelKey>,
    observation_count: usize,
}

impl ChannelAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one observation into its channel group, creating the group on
    /// first sight of the key.
    pub fn ingest(&mut self, obs: Observation) {
        let group = match self.groups.entry(obs.key()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                debug!(key = %entry.key(), "adding new channel key");
                self.key_order.push(entry.key().clone());
                entry.insert(ChannelGroup::default())
            }
        };
        group.push(&obs);
        self.observation_count += 1;
    }

    pub fn observation_count(&self) -> usize {
        self.observation_count
    }

    pub fn key_count(&self) -> usize {
        self.key_order.len()
    }

    /// Consumes the aggregator and produces one summary per key, in
    /// first-seen order, fitting a trend line to each cumulative-ratio
    /// series. Validity filtering is left to the report layer.
    pub fn finalize(mut self) -> Vec<ChannelSummary> {
        let mut summaries = Vec::with_capacity(self.key_order.len());

        for key in self.key_order.drain(..) {
            let Some(group) = self.groups.remove(&key) else {
                continue;
            };

            let signup_trend = trend::fit_line(&group.timestamps, &group.signup_ratios);
            let dna_trend = trend::fit_line(&group.timestamps, &group.dna_ratios);

            summaries.push(ChannelSummary {
                key,
                total_visits: group.cumulative_visits,
                total_signups: group.cumulative_signups,
                total_dna: group.cumulative_dna,
                signup_conversion: ratio(group.cumulative_signups, group.cumulative_visits),
                dna_conversion: ratio(group.cumulative_dna, group.cumulative_visits),
                signup_trend,
                dna_trend,
            });
        }

        summaries
    }
}
