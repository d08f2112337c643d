//! Shared configuration types for corpus pipelines.

mod base;
mod corpus;
mod goal;
mod pacing;
mod pipeline;
mod runner;
mod trace;

pub use base::ValidationError;
pub use corpus::CorpusFileConfig;
pub use goal::GoalConfig;
pub use pacing::PacingConfig;
pub use pipeline::PipelineConfig;
pub use runner::RunnerConfig;
pub use trace::TraceConfig;
