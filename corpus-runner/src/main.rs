//! Corpus runner binary.
//!
//! Loads configuration, applies the pacing intervals given on the command line and runs one
//! crawler/classifier pipeline until the collection goal is met. The progress trace goes to
//! standard output and logs to standard error.

use clap::Parser;
use corpus_config::shared::RunnerConfig;
use corpus_telemetry::tracing::init_tracing;
use std::process::ExitCode;
use tracing::error;

use crate::cli::RunnerArgs;
use crate::config::load_runner_config;
use crate::core::start_runner_with_config;
use crate::error::{RunnerError, RunnerResult};

mod cli;
mod config;
mod core;
mod error;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprint!("{}", err.render_report());
            ExitCode::FAILURE
        }
    }
}

fn run() -> RunnerResult<()> {
    let args = RunnerArgs::parse();

    // Flushes buffered log lines on drop, so it must outlive the runtime.
    let _log_flusher = init_tracing(env!("CARGO_BIN_NAME")).map_err(RunnerError::config)?;

    let mut runner_config = load_runner_config()?;
    args.apply_to(&mut runner_config.pipeline.pacing);
    runner_config.validate().map_err(RunnerError::config)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main(runner_config))
}

async fn async_main(runner_config: RunnerConfig) -> RunnerResult<()> {
    if let Err(err) = start_runner_with_config(runner_config).await {
        error!("{err}");

        return Err(err);
    }

    Ok(())
}
