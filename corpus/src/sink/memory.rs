use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::error::CorpusResult;
use crate::sink::CorpusSink;
use crate::types::CorpusRecord;

#[derive(Debug, Default)]
struct Inner {
    records: Vec<CorpusRecord>,
    shutdown_calls: usize,
}

/// In-memory sink for testing and development purposes.
///
/// [`MemorySink`] keeps every appended record so tests can inspect what the classifier
/// persisted and in which order.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    inner: Arc<Mutex<Inner>>,
}

impl MemorySink {
    /// Creates a new empty memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all records appended so far.
    pub async fn records(&self) -> Vec<CorpusRecord> {
        let inner = self.inner.lock().await;
        inner.records.clone()
    }

    /// Returns the persisted records rendered as corpus lines.
    pub async fn lines(&self) -> Vec<String> {
        let inner = self.inner.lock().await;
        inner.records.iter().map(ToString::to_string).collect()
    }

    /// Returns how many times [`CorpusSink::shutdown`] was called.
    pub async fn shutdown_calls(&self) -> usize {
        let inner = self.inner.lock().await;
        inner.shutdown_calls
    }
}

impl CorpusSink for MemorySink {
    fn name() -> &'static str {
        "memory"
    }

    async fn shutdown(&self) -> CorpusResult<()> {
        let mut inner = self.inner.lock().await;
        inner.shutdown_calls += 1;

        info!(records = inner.records.len(), "memory sink shut down");

        Ok(())
    }

    async fn append(&self, record: &CorpusRecord) -> CorpusResult<()> {
        let mut inner = self.inner.lock().await;
        inner.records.push(record.clone());

        Ok(())
    }
}
