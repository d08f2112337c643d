use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Location of the corpus file records are appended to.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct CorpusFileConfig {
    #[serde(default = "default_path")]
    pub path: PathBuf,
}

impl CorpusFileConfig {
    /// Default corpus file, relative to the working directory.
    pub const DEFAULT_PATH: &'static str = "textCorpus.txt";
}

impl Default for CorpusFileConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

fn default_path() -> PathBuf {
    PathBuf::from(CorpusFileConfig::DEFAULT_PATH)
}
