use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::CorpusResult;
use crate::sink::CorpusSink;
use crate::sink::memory::MemorySink;
use crate::types::CorpusRecord;

/// Sink wrapping a [`MemorySink`] whose `fail_at`-th append fails with an I/O error.
#[derive(Debug)]
pub struct FailingSink {
    inner: MemorySink,
    fail_at: u64,
    appended: AtomicU64,
}

impl FailingSink {
    pub fn new(inner: MemorySink, fail_at: u64) -> Self {
        Self {
            inner,
            fail_at,
            appended: AtomicU64::new(0),
        }
    }
}

impl CorpusSink for FailingSink {
    fn name() -> &'static str {
        "failing"
    }

    async fn shutdown(&self) -> CorpusResult<()> {
        self.inner.shutdown().await
    }

    async fn append(&self, record: &CorpusRecord) -> CorpusResult<()> {
        let call = self.appended.fetch_add(1, Ordering::AcqRel) + 1;
        if call == self.fail_at {
            let err = std::io::Error::new(std::io::ErrorKind::StorageFull, "injected disk full");
            return Err(err.into());
        }

        self.inner.append(record).await
    }
}
