use clap::Parser;
use corpus_config::shared::PacingConfig;
use tracing::{debug, warn};

/// Runs crawlers feeding a classifier until every category holds enough articles.
#[derive(Debug, Parser)]
#[command(name = "corpus-runner", version)]
pub struct RunnerArgs {
    /// Microseconds a crawler waits between generating and enqueueing an article.
    #[arg(allow_hyphen_values = true)]
    crawl_interval_us: Option<String>,

    /// Microseconds the classifier waits between dequeueing and classifying an article.
    #[arg(allow_hyphen_values = true)]
    classify_interval_us: Option<String>,
}

impl RunnerArgs {
    /// Overrides the configured pacing with the intervals given on the command line.
    ///
    /// A missing interval keeps the configured value. An interval that is not a non-negative
    /// integer is replaced by zero.
    pub fn apply_to(&self, pacing: &mut PacingConfig) {
        match self.crawl_interval_us.as_deref() {
            Some(raw) => pacing.crawl_interval_us = parse_interval("crawl_interval_us", raw),
            None => debug!(
                configured = pacing.crawl_interval_us,
                "crawl interval not given, using configured value"
            ),
        }

        match self.classify_interval_us.as_deref() {
            Some(raw) => pacing.classify_interval_us = parse_interval("classify_interval_us", raw),
            None => debug!(
                configured = pacing.classify_interval_us,
                "classify interval not given, using configured value"
            ),
        }
    }
}

fn parse_interval(name: &str, raw: &str) -> u64 {
    match raw.trim().parse::<u64>() {
        Ok(micros) => micros,
        Err(err) => {
            warn!(argument = name, value = raw, error = %err, "invalid interval, using 0");
            0
        }
    }
}
