//! Bounded-buffer crawler and classifier pipeline.
//!
//! Several crawler workers generate [`types::Article`]s and publish them into a shared,
//! fixed-capacity ring buffer guarded by a [`concurrency::gate::SyncGate`]. A single classifier
//! worker drains the buffer, labels every article and appends it to a [`sink::CorpusSink`].
//! The run ends once every category reached its threshold and the classifier drained whatever
//! was still in flight.
//!
//! The [`pipeline::Pipeline`] wires everything together:
//!
//! ```rust,no_run
//! use corpus::classify::FirstLetterClassifier;
//! use corpus::pipeline::Pipeline;
//! use corpus::sink::file::FileSink;
//! use corpus::source::RandomArticleSource;
//! use corpus_config::shared::PipelineConfig;
//!
//! # async fn run() -> corpus::error::CorpusResult<()> {
//! let config = PipelineConfig::default();
//! let classifier = FirstLetterClassifier::new(config.goal.categories);
//! let sink = FileSink::new(&config.corpus.path);
//!
//! let mut pipeline = Pipeline::new(config, RandomArticleSource::default(), classifier, sink);
//! pipeline.start()?;
//! let report = pipeline.wait().await?;
//! println!("stored {} articles", report.stored);
//! # Ok(())
//! # }
//! ```

pub mod buffer;
pub mod classify;
pub mod concurrency;
pub mod error;
mod macros;
pub mod pipeline;
pub mod sink;
pub mod source;
pub mod tally;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod trace;
pub mod types;
pub mod workers;
