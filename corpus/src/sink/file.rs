use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::CorpusResult;
use crate::sink::CorpusSink;
use crate::types::CorpusRecord;

/// Appends records as text lines to a corpus file.
///
/// Each record becomes one line `<sequence> <label> <content>`. The file is opened in append
/// mode on the first record and created if it does not exist, so consecutive runs accumulate
/// into the same corpus.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
    file: Arc<Mutex<Option<File>>>,
}

impl FileSink {
    /// Creates a sink appending to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: Arc::new(Mutex::new(None)),
        }
    }
}

impl CorpusSink for FileSink {
    fn name() -> &'static str {
        "file"
    }

    async fn shutdown(&self) -> CorpusResult<()> {
        let mut file = self.file.lock().await;
        if let Some(file) = file.as_mut() {
            file.sync_data().await?;
        }

        // Dropping the handle closes the file, a later append reopens it.
        *file = None;

        info!(path = %self.path.display(), "corpus file closed");

        Ok(())
    }

    async fn append(&self, record: &CorpusRecord) -> CorpusResult<()> {
        let mut guard = self.file.lock().await;

        let file = match guard.take() {
            Some(file) => file,
            None => {
                debug!(path = %self.path.display(), "opening corpus file");

                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.path)
                    .await?
            }
        };
        let file = guard.insert(file);

        let line = format!("{record}\n");
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}
