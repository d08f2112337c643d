use corpus_config::shared::RunnerConfig;
use corpus_config::{LoadConfigError, load_config};
use tracing::warn;

use crate::error::{RunnerError, RunnerResult};

/// Loads the runner configuration.
///
/// Uses the layered loader from [`corpus_config`]. Without a `configuration` directory the
/// defaults are used. Validation is left to the caller, since command line arguments are
/// applied on top of the loaded values.
pub fn load_runner_config() -> RunnerResult<RunnerConfig> {
    match load_config::<RunnerConfig>() {
        Ok(config) => Ok(config),
        Err(LoadConfigError::MissingConfigurationDirectory(directory)) => {
            warn!(
                directory = %directory.display(),
                "configuration directory not found, using defaults"
            );

            Ok(RunnerConfig::default())
        }
        Err(err) => Err(RunnerError::config(err)),
    }
}
