use corpus::classify::FirstLetterClassifier;
use corpus::sink::file::FileSink;
use corpus::test_utils::pipeline::{create_pipeline, test_config};
use corpus::test_utils::source::CyclingArticleSource;
use corpus_telemetry::tracing::init_test_tracing;

#[tokio::test(flavor = "multi_thread")]
async fn corpus_file_holds_one_line_per_stored_article() {
    init_test_tracing();

    let path = std::env::temp_dir().join(format!("corpus-{}.txt", uuid::Uuid::new_v4()));
    let mut config = test_config(3, 12);
    config.corpus.path = path.clone();

    let (mut pipeline, _) = create_pipeline(
        config,
        CyclingArticleSource::new(),
        FirstLetterClassifier::new(13),
        FileSink::new(&path),
    );

    pipeline.start().unwrap();
    let report = pipeline.wait().await.unwrap();

    let contents = tokio::fs::read_to_string(&path).await.unwrap();
    let lines = contents.lines().collect::<Vec<_>>();
    assert_eq!(lines.len() as u64, report.stored);

    for (index, line) in lines.iter().enumerate() {
        let mut parts = line.splitn(3, ' ');
        let sequence = parts.next().unwrap().parse::<u64>().unwrap();
        let label = parts.next().unwrap().parse::<u8>().unwrap();
        let content = parts.next().unwrap();

        assert_eq!(sequence, index as u64 + 1);
        assert!((1..=13).contains(&label));
        assert!(content.ends_with(" article"));
    }

    tokio::fs::remove_file(&path).await.unwrap();
}
