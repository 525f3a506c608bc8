//! Batch report pipeline — drives generate → render → deliver per record,
//! strictly one record at a time, aggregating per-item outcomes.
//!
//! Per-record failures never cross the batch boundary: they are converted
//! to counted failures inside [`BatchOutcome`]. The only caller-visible
//! error is misuse (an empty selection).

pub mod runner;
pub mod selection;
pub mod types;

pub use runner::ReportPipeline;
pub use selection::SelectionSet;
pub use types::{new_batch_id, BatchConfig, BatchFailure, BatchOutcome, ProgressUpdate};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("no patients selected for batch delivery")]
    EmptySelection,
}
