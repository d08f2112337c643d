//! Testing utilities for pipeline runs.
//!
//! - [`source`] deterministic article sources
//! - [`classify`] classifiers failing on demand
//! - [`sink`] sinks failing on demand
//! - [`pipeline`] helpers building pipelines over in-memory collaborators

pub mod classify;
pub mod pipeline;
pub mod sink;
pub mod source;
