use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;

/// Collection goal of the classifier.
///
/// The run is complete once each of the `categories` counters holds at least `threshold`
/// articles.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GoalConfig {
    /// Number of categories articles are classified into.
    #[serde(default = "default_categories")]
    pub categories: u8,
    /// Minimum number of articles every category must reach.
    #[serde(default = "default_threshold")]
    pub threshold: u64,
}

impl GoalConfig {
    /// Default number of categories.
    pub const DEFAULT_CATEGORIES: u8 = 13;

    /// Default per-category threshold.
    pub const DEFAULT_THRESHOLD: u64 = 5;

    /// Largest number of categories, one per letter of the alphabet.
    pub const MAX_CATEGORIES: u8 = 26;

    /// Validates goal configuration settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.categories == 0 || self.categories > Self::MAX_CATEGORIES {
            return Err(ValidationError::invalid_field(
                "goal.categories",
                "must be between 1 and 26",
            ));
        }

        if self.threshold == 0 {
            return Err(ValidationError::invalid_field(
                "goal.threshold",
                "must be greater than 0",
            ));
        }

        Ok(())
    }
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            threshold: default_threshold(),
        }
    }
}

fn default_categories() -> u8 {
    GoalConfig::DEFAULT_CATEGORIES
}

fn default_threshold() -> u64 {
    GoalConfig::DEFAULT_THRESHOLD
}
