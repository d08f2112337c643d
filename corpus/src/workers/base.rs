use std::future::Future;
use std::sync::Arc;

use crate::concurrency::gate::SyncGate;
use crate::concurrency::shutdown::ShutdownLatch;
use crate::error::CorpusResult;
use crate::types::{Article, CrawlerId};

/// Classification of pipeline worker types with identifying properties.
///
/// Used to name workers in logs and errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WorkerType {
    /// Worker producing articles into the shared buffer.
    Crawler {
        /// Zero-based identifier of the crawler.
        crawler_id: CrawlerId,
    },
    /// Worker draining the shared buffer into the corpus.
    Classifier,
}

/// Trait for background workers of the pipeline.
///
/// [`Worker`] spawns the worker as a task and returns a handle that can be used to wait for
/// its outcome. The generic parameter `H` represents the handle type and `O` the value the
/// worker produces once it completes.
pub trait Worker<H, O>
where
    H: WorkerHandle<O>,
{
    /// Spawns the worker on the current runtime.
    ///
    /// Must be called from within a tokio runtime.
    fn spawn(self) -> H;
}

/// Handle for waiting on a running worker.
pub trait WorkerHandle<O> {
    /// Returns the type of the worker behind this handle.
    fn worker_type(&self) -> WorkerType;

    /// Waits for the worker to complete and returns its outcome.
    ///
    /// A panicking or cancelled worker task is reported as an error of the matching kind.
    /// The handle is consumed by this operation.
    fn wait(self) -> impl Future<Output = CorpusResult<O>> + Send;
}

/// Shared state every worker of one pipeline run coordinates through.
#[derive(Debug, Clone)]
pub struct WorkerContext {
    pub gate: Arc<SyncGate<Article>>,
    pub latch: ShutdownLatch,
}

/// Stops the whole run if the owning worker exits without reaching [`FailureGuard::disarm`].
///
/// Dropped on an error return or while unwinding from a panic, the guard trips the shutdown
/// latch and closes the gate so no peer stays blocked on a semaphore that nobody signals
/// anymore.
#[derive(Debug)]
pub(crate) struct FailureGuard {
    context: Option<WorkerContext>,
}

impl FailureGuard {
    pub(crate) fn new(context: WorkerContext) -> Self {
        Self {
            context: Some(context),
        }
    }

    pub(crate) fn disarm(mut self) {
        self.context = None;
    }
}

impl Drop for FailureGuard {
    fn drop(&mut self) {
        if let Some(context) = self.context.take() {
            context.latch.trip();
            context.gate.close();
        }
    }
}
