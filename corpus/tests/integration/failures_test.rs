use corpus::classify::FirstLetterClassifier;
use corpus::error::ErrorKind;
use corpus::sink::memory::MemorySink;
use corpus::test_utils::classify::FailingClassifier;
use corpus::test_utils::pipeline::{create_pipeline, test_config};
use corpus::test_utils::sink::FailingSink;
use corpus::test_utils::source::{CyclingArticleSource, FixedArticleSource};
use corpus_telemetry::tracing::init_test_tracing;

#[tokio::test(flavor = "multi_thread")]
async fn classification_failure_stops_every_worker() {
    init_test_tracing();

    let sink = MemorySink::new();
    let (mut pipeline, _) = create_pipeline(
        test_config(3, 4),
        CyclingArticleSource::new(),
        FailingClassifier::new(13, 10),
        sink.clone(),
    );

    pipeline.start().unwrap();
    let err = pipeline.wait().await.unwrap_err();

    assert_eq!(err.kinds(), vec![ErrorKind::ClassificationFailed]);
    assert_eq!(sink.records().await.len(), 9);
    assert_eq!(sink.shutdown_calls().await, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn unclassifiable_article_is_reported() {
    init_test_tracing();

    let mut config = test_config(2, 2);
    config.goal.categories = 1;
    let (mut pipeline, _) = create_pipeline(
        config,
        FixedArticleSource::new("42 !?"),
        FirstLetterClassifier::new(1),
        MemorySink::new(),
    );

    pipeline.start().unwrap();
    let err = pipeline.wait().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ClassificationFailed);
    assert_eq!(err.detail(), Some("\"42 !?\""));
}

#[tokio::test(flavor = "multi_thread")]
async fn sink_failure_is_reported_as_io_error() {
    init_test_tracing();

    let memory = MemorySink::new();
    let (mut pipeline, _) = create_pipeline(
        test_config(2, 6),
        CyclingArticleSource::new(),
        FirstLetterClassifier::new(13),
        FailingSink::new(memory.clone(), 3),
    );

    pipeline.start().unwrap();
    let err = pipeline.wait().await.unwrap_err();

    assert_eq!(err.kinds(), vec![ErrorKind::SinkIoError]);
    assert_eq!(memory.records().await.len(), 2);
    assert_eq!(memory.shutdown_calls().await, 1);
}
