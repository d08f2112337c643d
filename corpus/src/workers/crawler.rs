use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info};

use crate::concurrency::gate::Publish;
use crate::corpus_error;
use crate::error::{CorpusResult, ErrorKind};
use crate::source::ArticleSource;
use crate::trace::{Actor, ProgressTracer, Transition};
use crate::types::CrawlerId;
use crate::workers::base::{FailureGuard, Worker, WorkerContext, WorkerHandle, WorkerType};

/// Outcome of one crawler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlerStats {
    /// Articles accepted into the buffer.
    pub enqueued: u64,
    /// Articles handed back because shutdown started while they were being generated.
    pub refused: u64,
}

/// Handle for waiting on a crawler worker.
#[derive(Debug)]
pub struct CrawlerWorkerHandle {
    crawler_id: CrawlerId,
    handle: JoinHandle<CorpusResult<CrawlerStats>>,
}

impl CrawlerWorkerHandle {
    /// Returns the zero-based id of the crawler.
    pub fn crawler_id(&self) -> CrawlerId {
        self.crawler_id
    }
}

impl WorkerHandle<CrawlerStats> for CrawlerWorkerHandle {
    fn worker_type(&self) -> WorkerType {
        WorkerType::Crawler {
            crawler_id: self.crawler_id,
        }
    }

    async fn wait(self) -> CorpusResult<CrawlerStats> {
        self.handle.await.map_err(|err| {
            if err.is_cancelled() {
                corpus_error!(
                    ErrorKind::CrawlerWorkerCancelled,
                    "Crawler worker was cancelled",
                    err
                )
            } else {
                corpus_error!(
                    ErrorKind::CrawlerWorkerPanic,
                    "Crawler worker panicked",
                    err
                )
            }
        })?
    }
}

/// Worker generating articles and publishing them into the shared buffer.
///
/// A crawler loops until the shutdown latch is tripped: it reserves a free slot (blocking
/// while the buffer is full), generates an article without holding any lock, and publishes
/// it. The latch is checked at the top of every iteration, after waking from a wait and,
/// through [`crate::concurrency::gate::SyncGate::publish`], under the buffer lock.
#[derive(Debug)]
pub struct CrawlerWorker<G> {
    crawler_id: CrawlerId,
    context: WorkerContext,
    source: Arc<G>,
    tracer: ProgressTracer,
    crawl_interval: Option<Duration>,
}

impl<G> CrawlerWorker<G> {
    pub fn new(
        crawler_id: CrawlerId,
        context: WorkerContext,
        source: Arc<G>,
        tracer: ProgressTracer,
        crawl_interval: Option<Duration>,
    ) -> Self {
        Self {
            crawler_id,
            context,
            source,
            tracer,
            crawl_interval,
        }
    }
}

impl<G> CrawlerWorker<G>
where
    G: ArticleSource + Send + Sync + 'static,
{
    async fn run(self) -> CorpusResult<CrawlerStats> {
        let guard = FailureGuard::new(self.context.clone());

        let actor = Actor::Crawler(self.crawler_id);
        let gate = &self.context.gate;
        let latch = &self.context.latch;
        let mut stats = CrawlerStats::default();

        self.tracer.emit(actor, Transition::Start);

        while !latch.is_tripped() {
            // Advisory only, the slot acquisition below is what actually blocks.
            let waiting = gate.available_space() == 0;
            if waiting {
                self.tracer.emit(actor, Transition::Wait);
            }

            let Some(slot) = gate.acquire_space().await else {
                debug!("gate closed while waiting for space");
                break;
            };

            if waiting {
                self.tracer.emit(actor, Transition::Resume);

                if latch.is_tripped() {
                    debug!("woke up after shutdown, releasing slot");
                    break;
                }
            }

            self.tracer.emit(actor, Transition::Grab);
            let article = self.source.generate();

            if let Some(interval) = self.crawl_interval {
                tokio::time::sleep(interval).await;
            }

            match gate.publish(slot, article, latch)? {
                Publish::Accepted => {
                    stats.enqueued += 1;
                    self.tracer.emit(actor, Transition::Grabbed);
                }
                Publish::Refused(_) => {
                    stats.refused += 1;
                    debug!("shutdown started while generating, article discarded");
                    break;
                }
            }
        }

        self.tracer.emit(actor, Transition::Quit);
        guard.disarm();

        info!(
            enqueued = stats.enqueued,
            refused = stats.refused,
            "crawler finished"
        );

        Ok(stats)
    }
}

impl<G> Worker<CrawlerWorkerHandle, CrawlerStats> for CrawlerWorker<G>
where
    G: ArticleSource + Send + Sync + 'static,
{
    fn spawn(self) -> CrawlerWorkerHandle {
        let crawler_id = self.crawler_id;

        // Crawler ids are one-based in logs to match the trace columns.
        info!(crawler_id = crawler_id + 1, "starting crawler worker");
        let span = tracing::info_span!("crawler", crawler_id = crawler_id + 1);
        let handle = tokio::spawn(self.run().instrument(span));

        CrawlerWorkerHandle { crawler_id, handle }
    }
}
