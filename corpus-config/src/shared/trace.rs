use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;

/// Settings of the columnar progress trace printed to standard output.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct TraceConfig {
    /// Whether trace lines are printed at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Width of one actor column in characters.
    #[serde(default = "default_column_width")]
    pub column_width: usize,
}

impl TraceConfig {
    /// Default column width.
    pub const DEFAULT_COLUMN_WIDTH: usize = 15;

    /// Validates trace configuration settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.column_width == 0 {
            return Err(ValidationError::invalid_field(
                "trace.column_width",
                "must be greater than 0",
            ));
        }

        Ok(())
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            column_width: default_column_width(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_column_width() -> usize {
    TraceConfig::DEFAULT_COLUMN_WIDTH
}
