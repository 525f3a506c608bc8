//! Careport — patient records and batch health-report delivery.
//!
//! The library keeps a single flat table of patient records in SQLite and,
//! for a caller-selected batch of records, runs each one through
//! narrative generation → PDF rendering → email delivery, accumulating
//! per-record outcomes without one failure aborting the batch.
//!
//! Any interactive surface is a thin caller: the pipeline reports live
//! progress through a plain callback and returns an aggregated
//! [`pipeline::BatchOutcome`].

pub mod config;
pub mod models;
pub mod db;
pub mod narrative;
pub mod report;
pub mod mail;
pub mod pipeline;

use tracing_subscriber::EnvFilter;

/// Initialize tracing with an env-filterable fmt subscriber.
///
/// Safe to call more than once (later calls are no-ops), so tests and
/// embedding binaries can both use it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}
