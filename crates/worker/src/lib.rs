//! `greeter-worker` library crate.
//!
//! Exposes the run pipeline for integration testing. The binary
//! entrypoint lives in `main.rs`.

pub mod pipeline;

pub use pipeline::{run, run_from_env, PipelineError, RunSummary};
