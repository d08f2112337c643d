use corpus::classify::FirstLetterClassifier;
use corpus::pipeline::{Pipeline, PipelineReport};
use corpus::sink::file::FileSink;
use corpus::source::RandomArticleSource;
use corpus_config::shared::RunnerConfig;
use tracing::info;

use crate::error::RunnerResult;

/// Runs one pipeline to completion with the provided configuration.
///
/// Articles come from random text, are classified by their first letter and appended to the
/// configured corpus file.
pub async fn start_runner_with_config(config: RunnerConfig) -> RunnerResult<PipelineReport> {
    info!("starting corpus runner");

    log_config(&config);

    let pipeline_config = config.pipeline;
    let classifier = FirstLetterClassifier::new(pipeline_config.goal.categories);
    let sink = FileSink::new(&pipeline_config.corpus.path);

    let mut pipeline = Pipeline::new(
        pipeline_config,
        RandomArticleSource::default(),
        classifier,
        sink,
    );
    pipeline.start()?;

    let report = pipeline.wait().await?;

    info!(
        goal_count = ?report.goal_count,
        stored = report.stored,
        tally = ?report.tally.counts(),
        "corpus collection finished"
    );
    for (crawler_id, stats) in report.crawlers.iter().enumerate() {
        info!(
            crawler = crawler_id + 1,
            enqueued = stats.enqueued,
            refused = stats.refused,
            "crawler summary"
        );
    }

    Ok(report)
}

fn log_config(config: &RunnerConfig) {
    let pipeline = &config.pipeline;

    info!(
        buffer_capacity = pipeline.buffer_capacity,
        crawlers = pipeline.crawlers,
        categories = pipeline.goal.categories,
        threshold = pipeline.goal.threshold,
        crawl_interval_us = pipeline.pacing.crawl_interval_us,
        classify_interval_us = pipeline.pacing.classify_interval_us,
        corpus_path = %pipeline.corpus.path.display(),
        trace = pipeline.trace.enabled,
        "pipeline config"
    );
}
