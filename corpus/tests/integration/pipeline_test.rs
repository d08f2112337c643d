use corpus::classify::FirstLetterClassifier;
use corpus::sink::memory::MemorySink;
use corpus::test_utils::pipeline::{create_pipeline, test_config, trace_labels};
use corpus::test_utils::source::{CountingSource, CyclingArticleSource, FixedArticleSource};
use corpus::types::CorpusRecord;
use corpus_telemetry::tracing::init_test_tracing;

fn assert_sequenced(records: &[CorpusRecord]) {
    let sequences = records.iter().map(|record| record.sequence).collect::<Vec<_>>();
    let expected = (1..=records.len() as u64).collect::<Vec<_>>();

    assert_eq!(sequences, expected);
}

#[tokio::test(flavor = "multi_thread")]
async fn single_crawler_reaches_goal_after_five_full_cycles() {
    init_test_tracing();

    let config = test_config(1, 12);
    let sink = MemorySink::new();
    let source = CyclingArticleSource::new();
    let (mut pipeline, _) = create_pipeline(
        config,
        source.clone(),
        FirstLetterClassifier::new(13),
        sink.clone(),
    );

    pipeline.start().unwrap();
    let report = pipeline.wait().await.unwrap();

    assert_eq!(report.goal_count, Some(65));
    assert!(report.stored >= 65);
    assert_eq!(report.enqueued(), report.stored);
    assert!(report.tally.counts().iter().all(|count| *count >= 5));

    // With one crawler the corpus holds articles exactly in generation order.
    let records = sink.records().await;
    assert_sequenced(&records);
    for (index, record) in records.iter().enumerate() {
        let letter = char::from(b'a' + (index % 13) as u8);
        assert_eq!(record.content, format!("{letter}{index} article"));
        assert_eq!(usize::from(record.label.get()), index % 13 + 1);
    }

    assert!(source.generated() >= report.stored);
    assert_eq!(sink.shutdown_calls().await, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn three_crawlers_lose_and_duplicate_nothing() {
    init_test_tracing();

    let config = test_config(3, 12);
    let sink = MemorySink::new();
    let (mut pipeline, _) = create_pipeline(
        config,
        CyclingArticleSource::new(),
        FirstLetterClassifier::new(13),
        sink.clone(),
    );

    pipeline.start().unwrap();
    let report = pipeline.wait().await.unwrap();

    let goal_count = report.goal_count.unwrap();
    assert!(goal_count >= 65);
    assert!(report.stored >= goal_count);
    assert_eq!(report.crawlers.len(), 3);
    assert_eq!(report.enqueued(), report.stored);

    let records = sink.records().await;
    assert_eq!(records.len() as u64, report.stored);
    assert_sequenced(&records);

    let mut contents = records
        .iter()
        .map(|record| record.content.clone())
        .collect::<Vec<_>>();
    contents.sort();
    contents.dedup();
    assert_eq!(contents.len(), records.len());
}

#[tokio::test(flavor = "multi_thread")]
async fn fixed_source_fills_a_single_category() {
    init_test_tracing();

    let mut config = test_config(2, 4);
    config.goal.categories = 1;
    let sink = MemorySink::new();
    let (mut pipeline, _) = create_pipeline(
        config,
        FixedArticleSource::new("apple pie"),
        FirstLetterClassifier::new(1),
        sink.clone(),
    );

    pipeline.start().unwrap();
    let report = pipeline.wait().await.unwrap();

    assert_eq!(report.goal_count, Some(5));
    assert_eq!(report.tally.counts(), &[report.stored]);

    let records = sink.records().await;
    assert!(records.iter().all(|record| record.label.get() == 1));
    assert!(records.iter().all(|record| record.content == "apple pie"));
}

#[tokio::test(flavor = "multi_thread")]
async fn counted_articles_are_stored_exactly_once() {
    init_test_tracing();

    let mut config = test_config(3, 5);
    config.goal.categories = 1;
    config.goal.threshold = 200;
    let sink = MemorySink::new();
    let (mut pipeline, _) = create_pipeline(
        config,
        CountingSource::new('z'),
        FirstLetterClassifier::new(1),
        sink.clone(),
    );

    pipeline.start().unwrap();
    let report = pipeline.wait().await.unwrap();
    assert!(report.stored >= 200);

    // Crawlers interleave freely, but every generated number is stored at most once.
    let mut numbers = sink
        .records()
        .await
        .iter()
        .map(|record| record.content[2..].parse::<u64>().unwrap())
        .collect::<Vec<_>>();
    numbers.sort_unstable();
    numbers.dedup();
    assert_eq!(numbers.len() as u64, report.stored);
}

#[tokio::test(flavor = "multi_thread")]
async fn trace_reports_goal_and_drain_exactly_once() {
    init_test_tracing();

    let config = test_config(3, 12);
    let (mut pipeline, capture) = create_pipeline(
        config,
        CyclingArticleSource::new(),
        FirstLetterClassifier::new(13),
        MemorySink::new(),
    );

    pipeline.start().unwrap();
    let report = pipeline.wait().await.unwrap();

    let header = capture.lines().first().cloned().unwrap();
    assert!(header.trim_start().starts_with("crawler1"));
    assert!(header.ends_with("classifier"));

    let labels = trace_labels(&capture);
    let goal_count = report.goal_count.unwrap();

    let enough = labels
        .iter()
        .filter(|label| label.ends_with("-enough"))
        .collect::<Vec<_>>();
    assert_eq!(enough, vec![&format!("{goal_count}-enough")]);

    let store = labels
        .iter()
        .filter(|label| label.ends_with("-store"))
        .collect::<Vec<_>>();
    assert_eq!(store, vec![&format!("{}-store", report.stored)]);

    assert_eq!(labels.iter().filter(|label| *label == "start").count(), 4);
    assert_eq!(labels.iter().filter(|label| *label == "quit").count(), 4);
    assert_eq!(
        labels.iter().filter(|label| *label == "f-clfy").count() as u64,
        report.stored
    );
    assert_eq!(
        labels.iter().filter(|label| *label == "f-grab").count() as u64,
        report.enqueued()
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn slow_classifier_makes_crawlers_wait_on_a_tiny_buffer() {
    init_test_tracing();

    let mut config = test_config(3, 1);
    config.pacing.classify_interval_us = 500;
    let sink = MemorySink::new();
    let (mut pipeline, capture) = create_pipeline(
        config,
        CyclingArticleSource::new(),
        FirstLetterClassifier::new(13),
        sink.clone(),
    );

    pipeline.start().unwrap();
    let report = pipeline.wait().await.unwrap();

    assert!(report.goal_count.unwrap() >= 65);
    assert_eq!(report.enqueued(), report.stored);
    assert_sequenced(&sink.records().await);

    let labels = trace_labels(&capture);
    assert!(labels.iter().any(|label| label == "wait"));
    assert!(labels.iter().any(|label| label == "s-wait"));
}

#[tokio::test(flavor = "multi_thread")]
async fn paced_crawlers_still_reach_the_goal() {
    init_test_tracing();

    let mut config = test_config(2, 3);
    config.pacing.crawl_interval_us = 100;
    let (mut pipeline, _) = create_pipeline(
        config,
        CyclingArticleSource::new(),
        FirstLetterClassifier::new(13),
        MemorySink::new(),
    );

    pipeline.start().unwrap();
    let report = pipeline.wait().await.unwrap();

    assert!(report.goal_count.unwrap() >= 65);
    assert_eq!(report.enqueued(), report.stored);
}
