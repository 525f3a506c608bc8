use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generate a unique batch run identifier.
pub fn new_batch_id() -> String {
    format!("batch-{}", Uuid::new_v4())
}

/// Configuration for a batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Pause between records. A deliberate rate-limit against saturating
    /// the delivery relay, not an incidental sleep; not applied after the
    /// last record.
    pub inter_item_delay: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            inter_item_delay: Duration::from_secs(1),
        }
    }
}

impl BatchConfig {
    /// No inter-item delay (tests, previews).
    pub fn without_delay() -> Self {
        Self {
            inter_item_delay: Duration::ZERO,
        }
    }
}

/// Live progress for one completed record. Emitted synchronously, in
/// processing order, exactly once per record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Records completed so far, strictly increasing 1..=total.
    pub completed: usize,
    pub total: usize,
    pub current_name: String,
}

/// One per-record failure, in original record order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub patient_name: String,
    pub reason: String,
}

/// Aggregated accounting for one batch run. Created fresh per run,
/// immutable once reported, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub batch_id: String,
    pub success_count: u32,
    pub failure_count: u32,
    pub failures: Vec<BatchFailure>,
    pub duration_ms: u64,
}

impl BatchOutcome {
    pub fn empty(batch_id: String) -> Self {
        Self {
            batch_id,
            success_count: 0,
            failure_count: 0,
            failures: Vec::new(),
            duration_ms: 0,
        }
    }

    pub fn total(&self) -> u32 {
        self.success_count + self.failure_count
    }
}
