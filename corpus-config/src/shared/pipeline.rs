use serde::{Deserialize, Serialize};

use crate::shared::{CorpusFileConfig, GoalConfig, PacingConfig, TraceConfig, ValidationError};

/// Configuration for a corpus pipeline.
///
/// Contains every setting required to run the crawlers and the classifier: buffer sizing,
/// worker count, the collection goal, pacing, the corpus location and the progress trace.
/// Every field has a default so partial configuration files are accepted.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct PipelineConfig {
    /// Number of slots of the shared ring buffer.
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,
    /// Number of crawler workers producing articles.
    #[serde(default = "default_crawlers")]
    pub crawlers: usize,
    /// Collection goal ending the run.
    #[serde(default)]
    pub goal: GoalConfig,
    /// Artificial worker delays.
    #[serde(default)]
    pub pacing: PacingConfig,
    /// Corpus file settings.
    #[serde(default)]
    pub corpus: CorpusFileConfig,
    /// Progress trace settings.
    #[serde(default)]
    pub trace: TraceConfig,
}

impl PipelineConfig {
    /// Default ring buffer capacity.
    pub const DEFAULT_BUFFER_CAPACITY: usize = 12;

    /// Default number of crawlers.
    pub const DEFAULT_CRAWLERS: usize = 3;

    /// Validates pipeline configuration settings.
    ///
    /// Ensures the buffer and the worker count are non-zero, then validates nested sections.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.buffer_capacity == 0 {
            return Err(ValidationError::invalid_field(
                "buffer_capacity",
                "must be greater than 0",
            ));
        }

        if self.crawlers == 0 {
            return Err(ValidationError::invalid_field(
                "crawlers",
                "must be greater than 0",
            ));
        }

        self.goal.validate()?;
        self.trace.validate()?;

        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: default_buffer_capacity(),
            crawlers: default_crawlers(),
            goal: GoalConfig::default(),
            pacing: PacingConfig::default(),
            corpus: CorpusFileConfig::default(),
            trace: TraceConfig::default(),
        }
    }
}

fn default_buffer_capacity() -> usize {
    PipelineConfig::DEFAULT_BUFFER_CAPACITY
}

fn default_crawlers() -> usize {
    PipelineConfig::DEFAULT_CRAWLERS
}
