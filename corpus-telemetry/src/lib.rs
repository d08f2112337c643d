//! Telemetry setup shared by the corpus binaries and tests.

pub mod tracing;
