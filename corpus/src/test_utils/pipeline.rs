use corpus_config::shared::PipelineConfig;

use crate::classify::Classifier;
use crate::pipeline::Pipeline;
use crate::sink::CorpusSink;
use crate::source::ArticleSource;
use crate::trace::{ProgressTracer, TraceCapture};

/// Returns the default configuration with `crawlers` crawlers and `buffer_capacity` slots.
pub fn test_config(crawlers: usize, buffer_capacity: usize) -> PipelineConfig {
    PipelineConfig {
        crawlers,
        buffer_capacity,
        ..PipelineConfig::default()
    }
}

/// Creates a pipeline whose progress trace is captured in memory.
pub fn create_pipeline<G, C, S>(
    config: PipelineConfig,
    source: G,
    classifier: C,
    sink: S,
) -> (Pipeline<G, C, S>, TraceCapture)
where
    G: ArticleSource + Send + Sync + 'static,
    C: Classifier + Send + Sync + 'static,
    S: CorpusSink + Send + Sync + 'static,
{
    let (tracer, capture) = ProgressTracer::capture(config.trace.column_width, config.crawlers);
    let pipeline = Pipeline::new(config, source, classifier, sink).with_tracer(tracer);

    (pipeline, capture)
}

/// Returns the trimmed labels of the captured trace, skipping the header.
pub fn trace_labels(capture: &TraceCapture) -> Vec<String> {
    capture
        .lines()
        .iter()
        .skip(1)
        .map(|line| line.trim().to_owned())
        .collect()
}
