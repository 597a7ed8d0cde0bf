//! Logging and in-process metrics for the request orchestration core.
//!
//! There is no distributed tracing backend here: turns are synchronous and
//! single-process, so a structured log line per component call plus a
//! handful of atomic counters is the whole observability surface (§0.2).

mod logging;
pub mod metrics;

pub use logging::init;
