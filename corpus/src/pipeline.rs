use corpus_config::shared::PipelineConfig;
use std::sync::Arc;
use tracing::{error, info};

use crate::bail;
use crate::classify::Classifier;
use crate::concurrency::gate::SyncGate;
use crate::concurrency::shutdown::ShutdownLatch;
use crate::error::{CorpusResult, ErrorKind};
use crate::sink::CorpusSink;
use crate::source::ArticleSource;
use crate::tally::CategoryTally;
use crate::trace::ProgressTracer;
use crate::workers::base::{Worker, WorkerContext, WorkerHandle};
use crate::workers::classifier::{ClassifierWorker, ClassifierWorkerHandle};
use crate::workers::crawler::{CrawlerStats, CrawlerWorker, CrawlerWorkerHandle};

/// Summary of a completed pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// Number of articles classified when the collection goal was met.
    pub goal_count: Option<u64>,
    /// Number of articles persisted, including the ones drained after the goal.
    pub stored: u64,
    /// Final per-category counts.
    pub tally: CategoryTally,
    /// Outcome of every crawler, indexed by crawler id.
    pub crawlers: Vec<CrawlerStats>,
}

impl PipelineReport {
    /// Returns the number of articles all crawlers managed to enqueue.
    pub fn enqueued(&self) -> u64 {
        self.crawlers.iter().map(|stats| stats.enqueued).sum()
    }
}

#[derive(Debug)]
enum PipelineState {
    NotStarted,
    Started {
        context: WorkerContext,
        crawlers: Vec<CrawlerWorkerHandle>,
        classifier: ClassifierWorkerHandle,
    },
}

/// A crawler and classifier pipeline over one shared bounded buffer.
///
/// The pipeline owns its collaborators until [`Pipeline::start`] hands them to the workers.
/// [`Pipeline::wait`] then joins every worker and reports the outcome.
#[derive(Debug)]
pub struct Pipeline<G, C, S> {
    config: Arc<PipelineConfig>,
    source: Arc<G>,
    classifier: Arc<C>,
    sink: Option<S>,
    tracer: ProgressTracer,
    state: PipelineState,
}

impl<G, C, S> Pipeline<G, C, S>
where
    G: ArticleSource + Send + Sync + 'static,
    C: Classifier + Send + Sync + 'static,
    S: CorpusSink + Send + Sync + 'static,
{
    /// Creates a pipeline printing its progress trace to standard output, unless tracing is
    /// disabled in `config`.
    pub fn new(config: PipelineConfig, source: G, classifier: C, sink: S) -> Self {
        let tracer = if config.trace.enabled {
            ProgressTracer::stdout(config.trace.column_width, config.crawlers)
        } else {
            ProgressTracer::silent(config.trace.column_width, config.crawlers)
        };

        Self {
            config: Arc::new(config),
            source: Arc::new(source),
            classifier: Arc::new(classifier),
            sink: Some(sink),
            tracer,
            state: PipelineState::NotStarted,
        }
    }

    /// Replaces the progress tracer.
    pub fn with_tracer(mut self, tracer: ProgressTracer) -> Self {
        self.tracer = tracer;
        self
    }

    /// Validates the configuration and spawns every worker.
    ///
    /// Crawlers are spawned first, in id order, then the classifier. Fails if the pipeline was
    /// already started or the configuration does not hold.
    ///
    /// Spawning needs a Tokio runtime, so this must be called from within one.
    pub fn start(&mut self) -> CorpusResult<()> {
        if !matches!(self.state, PipelineState::NotStarted) {
            bail!(ErrorKind::InvalidState, "Pipeline was already started");
        }

        if let Err(err) = self.config.validate() {
            bail!(
                ErrorKind::ConfigError,
                "Invalid pipeline configuration",
                err.to_string(),
                source: err
            );
        }

        let num_categories = self.classifier.num_categories();
        if num_categories != self.config.goal.categories {
            bail!(
                ErrorKind::ConfigError,
                "Classifier categories do not match the collection goal",
                format!(
                    "The classifier produces {num_categories} categories but the goal expects {}",
                    self.config.goal.categories
                )
            );
        }

        let Some(sink) = self.sink.take() else {
            bail!(ErrorKind::InvalidState, "Pipeline sink was already consumed");
        };

        info!(
            crawlers = self.config.crawlers,
            buffer_capacity = self.config.buffer_capacity,
            categories = self.config.goal.categories,
            threshold = self.config.goal.threshold,
            sink = S::name(),
            "starting pipeline"
        );

        let context = WorkerContext {
            gate: Arc::new(SyncGate::new(self.config.buffer_capacity)),
            latch: ShutdownLatch::new(),
        };

        self.tracer.print_header();

        let crawl_interval = self.config.pacing.crawl_interval();
        let crawlers = (0..self.config.crawlers)
            .map(|crawler_id| {
                CrawlerWorker::new(
                    crawler_id,
                    context.clone(),
                    self.source.clone(),
                    self.tracer.clone(),
                    crawl_interval,
                )
                .spawn()
            })
            .collect();

        let classifier = ClassifierWorker::new(
            context.clone(),
            self.classifier.clone(),
            sink,
            self.tracer.clone(),
            self.config.goal.threshold,
            self.config.pacing.classify_interval(),
        )
        .spawn();

        self.state = PipelineState::Started {
            context,
            crawlers,
            classifier,
        };

        Ok(())
    }

    /// Waits for every worker to complete and reports the run.
    ///
    /// The classifier is joined first since it decides when the run ends. All failures are
    /// collected, a single one is returned as is and several are aggregated.
    pub async fn wait(self) -> CorpusResult<PipelineReport> {
        let PipelineState::Started {
            context,
            crawlers,
            classifier,
        } = self.state
        else {
            bail!(
                ErrorKind::InvalidState,
                "Pipeline was not started, nothing to wait for"
            );
        };

        info!("waiting for classifier to complete");

        let mut errors = vec![];

        let classifier_stats = match classifier.wait().await {
            Ok(stats) => Some(stats),
            Err(err) => {
                error!(error = %err, "classifier failed, stopping crawlers");

                context.latch.trip();
                errors.push(err);

                None
            }
        };

        // Crawlers blocked on a full buffer are only woken up by closing the gate.
        context.gate.close();

        info!("waiting for crawlers to complete");

        let mut crawler_stats = Vec::with_capacity(crawlers.len());
        for crawler in crawlers {
            let crawler_id = crawler.crawler_id() + 1;
            match crawler.wait().await {
                Ok(stats) => crawler_stats.push(stats),
                Err(err) => {
                    error!(crawler_id, error = %err, "crawler failed");
                    errors.push(err);
                }
            }
        }

        if !errors.is_empty() {
            return Err(errors.into());
        }

        let Some(classifier_stats) = classifier_stats else {
            bail!(
                ErrorKind::InvalidState,
                "Classifier finished without reporting its outcome"
            );
        };

        let report = PipelineReport {
            goal_count: classifier_stats.goal_count,
            stored: classifier_stats.stored,
            tally: classifier_stats.tally,
            crawlers: crawler_stats,
        };

        info!(
            goal_count = ?report.goal_count,
            stored = report.stored,
            enqueued = report.enqueued(),
            "pipeline completed"
        );

        Ok(report)
    }
}
