use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{Instrument, info, warn};

use crate::classify::Classifier;
use crate::corpus_error;
use crate::error::{CorpusResult, ErrorKind};
use crate::sink::CorpusSink;
use crate::tally::CategoryTally;
use crate::trace::{Actor, ProgressTracer, Transition};
use crate::types::CorpusRecord;
use crate::workers::base::{FailureGuard, Worker, WorkerContext, WorkerHandle, WorkerType};

/// Outcome of the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierStats {
    /// Number of articles classified when the collection goal was first met.
    ///
    /// [`None`] if the run stopped before the goal was reached.
    pub goal_count: Option<u64>,
    /// Number of articles classified and persisted in total.
    pub stored: u64,
    /// Final per-category counts.
    pub tally: CategoryTally,
}

/// Handle for waiting on the classifier worker.
#[derive(Debug)]
pub struct ClassifierWorkerHandle {
    handle: JoinHandle<CorpusResult<ClassifierStats>>,
}

impl WorkerHandle<ClassifierStats> for ClassifierWorkerHandle {
    fn worker_type(&self) -> WorkerType {
        WorkerType::Classifier
    }

    async fn wait(self) -> CorpusResult<ClassifierStats> {
        self.handle.await.map_err(|err| {
            if err.is_cancelled() {
                corpus_error!(
                    ErrorKind::ClassifierWorkerCancelled,
                    "Classifier worker was cancelled",
                    err
                )
            } else {
                corpus_error!(
                    ErrorKind::ClassifierWorkerPanic,
                    "Classifier worker panicked",
                    err
                )
            }
        })?
    }
}

/// Worker draining the shared buffer, classifying articles and persisting them.
///
/// The classifier is the only consumer. It owns the article counter and the category tally,
/// trips the shutdown latch once the goal is met and keeps draining until the latch is tripped
/// and the buffer is empty. Crawlers cannot enqueue once the latch is tripped, so that state is
/// final.
#[derive(Debug)]
pub struct ClassifierWorker<C, S> {
    context: WorkerContext,
    classifier: Arc<C>,
    sink: S,
    tracer: ProgressTracer,
    threshold: u64,
    classify_interval: Option<Duration>,
}

impl<C, S> ClassifierWorker<C, S> {
    pub fn new(
        context: WorkerContext,
        classifier: Arc<C>,
        sink: S,
        tracer: ProgressTracer,
        threshold: u64,
        classify_interval: Option<Duration>,
    ) -> Self {
        Self {
            context,
            classifier,
            sink,
            tracer,
            threshold,
            classify_interval,
        }
    }
}

impl<C, S> ClassifierWorker<C, S>
where
    C: Classifier + Send + Sync + 'static,
    S: CorpusSink + Send + Sync + 'static,
{
    async fn run(self) -> CorpusResult<ClassifierStats> {
        let guard = FailureGuard::new(self.context.clone());

        let mut tally = CategoryTally::new(self.classifier.num_categories(), self.threshold);

        self.tracer.emit(Actor::Classifier, Transition::Start);

        let (stored, goal_count) = match self.drain(&mut tally).await {
            Ok(progress) => progress,
            Err(err) => {
                // The sink still gets to release its resources, but the loop error wins.
                if let Err(shutdown_err) = self.sink.shutdown().await {
                    warn!(
                        sink = S::name(),
                        error = %shutdown_err,
                        "failed to shut down sink after classifier error"
                    );
                }

                return Err(err);
            }
        };

        self.tracer
            .emit(Actor::Classifier, Transition::Stored { articles: stored });
        self.tracer.emit(Actor::Classifier, Transition::Quit);

        self.sink.shutdown().await?;
        guard.disarm();

        info!(stored, sink = S::name(), "classifier finished");

        Ok(ClassifierStats {
            goal_count,
            stored,
            tally,
        })
    }

    /// Takes, classifies and persists articles until the latch is tripped and the buffer is
    /// empty.
    ///
    /// Returns the number of stored articles and the count at which the goal was met.
    async fn drain(&self, tally: &mut CategoryTally) -> CorpusResult<(u64, Option<u64>)> {
        let actor = Actor::Classifier;
        let gate = &self.context.gate;
        let latch = &self.context.latch;

        let mut stored = 0u64;
        let mut goal_count = None;

        loop {
            let article = gate.take().await?;
            self.tracer.emit(actor, Transition::Classify);

            if let Some(interval) = self.classify_interval {
                tokio::time::sleep(interval).await;
            }

            let label = self.classifier.classify(&article)?;
            tally.record(label)?;
            stored += 1;

            let record = CorpusRecord {
                sequence: stored,
                label,
                content: article.into_content(),
            };
            self.sink.append(&record).await?;
            self.tracer.emit(actor, Transition::Classified);

            if goal_count.is_none() && tally.goal_reached() && latch.trip() {
                goal_count = Some(stored);
                self.tracer
                    .emit(actor, Transition::GoalReached { articles: stored });

                info!(articles = stored, "collection goal reached, draining buffer");
            }

            if latch.is_tripped() && gate.is_empty()? {
                return Ok((stored, goal_count));
            }
        }
    }
}

impl<C, S> Worker<ClassifierWorkerHandle, ClassifierStats> for ClassifierWorker<C, S>
where
    C: Classifier + Send + Sync + 'static,
    S: CorpusSink + Send + Sync + 'static,
{
    fn spawn(self) -> ClassifierWorkerHandle {
        info!("starting classifier worker");

        let span = tracing::info_span!("classifier");
        let handle = tokio::spawn(self.run().instrument(span));

        ClassifierWorkerHandle { handle }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::FirstLetterClassifier;
    use crate::concurrency::gate::{Publish, SyncGate};
    use crate::concurrency::shutdown::ShutdownLatch;
    use crate::sink::memory::MemorySink;
    use crate::test_utils::classify::{FailingClassifier, MislabelingClassifier};
    use crate::types::Article;

    fn context(capacity: usize) -> WorkerContext {
        WorkerContext {
            gate: Arc::new(SyncGate::new(capacity)),
            latch: ShutdownLatch::new(),
        }
    }

    async fn publish(context: &WorkerContext, content: &str) {
        let slot = context.gate.acquire_space().await.unwrap();
        let outcome = context
            .gate
            .publish(slot, Article::from(content), &context.latch)
            .unwrap();
        assert_eq!(outcome, Publish::Accepted);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn trips_latch_once_goal_is_met_and_drains_the_rest() {
        let context = context(8);
        let sink = MemorySink::new();
        let (tracer, capture) = ProgressTracer::capture(10, 1);

        // Two categories with a threshold of two: the goal holds after the fourth article.
        for content in ["alpha", "bravo", "apple", "banana", "avocado", "blueberry"] {
            publish(&context, content).await;
        }

        let worker = ClassifierWorker::new(
            context.clone(),
            Arc::new(FirstLetterClassifier::new(2)),
            sink.clone(),
            tracer,
            2,
            None,
        );
        let stats = worker.spawn().wait().await.unwrap();

        assert_eq!(stats.goal_count, Some(4));
        assert_eq!(stats.stored, 6);
        assert_eq!(stats.tally.counts(), &[3, 3]);
        assert!(context.latch.is_tripped());
        assert_eq!(sink.shutdown_calls().await, 1);
        assert_eq!(
            sink.lines().await,
            vec![
                "1 1 alpha",
                "2 2 bravo",
                "3 1 apple",
                "4 2 banana",
                "5 1 avocado",
                "6 2 blueberry",
            ]
        );

        let labels = capture
            .lines()
            .iter()
            .map(|line| line.trim().to_owned())
            .filter(|label| label.contains('-') && !label.starts_with('f'))
            .collect::<Vec<_>>();
        assert_eq!(labels, vec!["4-enough", "6-store"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unclassifiable_article_fails_and_closes_the_gate() {
        let context = context(4);
        publish(&context, "1234").await;

        let worker = ClassifierWorker::new(
            context.clone(),
            Arc::new(FirstLetterClassifier::new(13)),
            MemorySink::new(),
            ProgressTracer::silent(10, 1),
            5,
            None,
        );
        let err = worker.spawn().wait().await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ClassificationFailed);
        assert!(context.gate.is_closed());
        assert!(context.latch.is_tripped());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn closed_gate_before_goal_is_an_error() {
        let context = context(4);

        let worker = ClassifierWorker::new(
            context.clone(),
            Arc::new(FirstLetterClassifier::new(13)),
            MemorySink::new(),
            ProgressTracer::silent(10, 1),
            5,
            None,
        );
        let handle = worker.spawn();
        context.gate.close();

        let err = handle.wait().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GateClosed);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn label_outside_the_tally_persists_nothing() {
        let context = context(4);
        let sink = MemorySink::new();
        for content in ["dog", "dune", "dusk"] {
            publish(&context, content).await;
        }

        // Labels over four categories, tally over two: "d" maps to label 4.
        let worker = ClassifierWorker::new(
            context.clone(),
            Arc::new(MislabelingClassifier::new(2, 4)),
            sink.clone(),
            ProgressTracer::silent(10, 1),
            1,
            None,
        );
        let err = worker.spawn().wait().await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert!(sink.records().await.is_empty());
        assert!(context.gate.is_closed());
        assert!(context.latch.is_tripped());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn sink_is_shut_down_when_classification_fails() {
        let context = context(4);
        let sink = MemorySink::new();
        for content in ["alpha", "bravo"] {
            publish(&context, content).await;
        }

        let worker = ClassifierWorker::new(
            context.clone(),
            Arc::new(FailingClassifier::new(2, 2)),
            sink.clone(),
            ProgressTracer::silent(10, 1),
            5,
            None,
        );
        let err = worker.spawn().wait().await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ClassificationFailed);
        assert_eq!(sink.lines().await, vec!["1 1 alpha"]);
        assert_eq!(sink.shutdown_calls().await, 1);
    }
}
