use serde::{Deserialize, Serialize};

use crate::shared::{PipelineConfig, ValidationError};

/// Complete configuration of the corpus runner binary.
///
/// Typically loaded from configuration files at startup; command line intervals are applied
/// on top of it.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Configuration for the crawler pipeline.
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl RunnerConfig {
    /// Validates the complete runner configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.pipeline.validate()
    }
}
