use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Artificial delays slowing the workers down so the interleaving becomes visible.
///
/// Both intervals are in microseconds, zero disables the delay.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct PacingConfig {
    /// Delay of a crawler after generating an article and before enqueueing it.
    #[serde(default)]
    pub crawl_interval_us: u64,
    /// Delay of the classifier after dequeueing an article and before classifying it.
    #[serde(default)]
    pub classify_interval_us: u64,
}

impl PacingConfig {
    pub fn crawl_interval(&self) -> Option<Duration> {
        non_zero_micros(self.crawl_interval_us)
    }

    pub fn classify_interval(&self) -> Option<Duration> {
        non_zero_micros(self.classify_interval_us)
    }
}

fn non_zero_micros(micros: u64) -> Option<Duration> {
    (micros > 0).then(|| Duration::from_micros(micros))
}
