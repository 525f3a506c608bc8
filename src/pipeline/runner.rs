//! ReportPipeline orchestrates generate, render, and deliver per record.
//!
//! Runs strictly sequentially (the generation and delivery services are
//! rate-limited, and observers expect progress in processing order).

use std::time::Instant;

use super::types::{new_batch_id, BatchConfig, BatchFailure, BatchOutcome, ProgressUpdate};
use super::PipelineError;
use crate::mail::transport::MailTransport;
use crate::mail::{deliver, DeliveryReport};
use crate::models::Patient;
use crate::narrative::NarrativeGenerator;
use crate::report;

pub struct ReportPipeline<'a> {
    generator: &'a NarrativeGenerator,
    transport: &'a dyn MailTransport,
    config: BatchConfig,
}

impl<'a> ReportPipeline<'a> {
    pub fn new(
        generator: &'a NarrativeGenerator,
        transport: &'a dyn MailTransport,
        config: BatchConfig,
    ) -> Self {
        Self {
            generator,
            transport,
            config,
        }
    }

    /// Run the full pipeline over a selected, ordered record sequence.
    ///
    /// Per record: generate narrative (never fails), render the PDF (a
    /// failure counts against that record only), attempt delivery, then
    /// report progress. `on_progress` is called exactly once per record,
    /// synchronously and in order, with `completed` running 1..=N.
    ///
    /// An empty input is caller misuse and the one reported condition that
    /// crosses the boundary; every per-record cause stays in the outcome.
    pub fn run_batch(
        &self,
        patients: &[Patient],
        on_progress: &mut dyn FnMut(ProgressUpdate),
    ) -> Result<BatchOutcome, PipelineError> {
        if patients.is_empty() {
            return Err(PipelineError::EmptySelection);
        }

        let start = Instant::now();
        let total = patients.len();
        let mut outcome = BatchOutcome::empty(new_batch_id());

        tracing::info!(batch_id = %outcome.batch_id, total, "Starting batch report delivery");

        for (index, patient) in patients.iter().enumerate() {
            let delivery = self.process_one(patient);

            if delivery.ok {
                outcome.success_count += 1;
            } else {
                outcome.failure_count += 1;
                outcome.failures.push(BatchFailure {
                    patient_name: patient.name.clone(),
                    reason: delivery.detail,
                });
            }

            on_progress(ProgressUpdate {
                completed: index + 1,
                total,
                current_name: patient.name.clone(),
            });

            // Rate-limit between records; nothing follows the last one.
            if index + 1 < total && !self.config.inter_item_delay.is_zero() {
                std::thread::sleep(self.config.inter_item_delay);
            }
        }

        outcome.duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            batch_id = %outcome.batch_id,
            sent = outcome.success_count,
            failed = outcome.failure_count,
            duration_ms = outcome.duration_ms,
            "Batch finished"
        );
        Ok(outcome)
    }

    /// One-off send for a single record: generate, render, deliver. No
    /// progress callback, no inter-item delay.
    pub fn run_single(&self, patient: &Patient) -> DeliveryReport {
        self.process_one(patient)
    }

    fn process_one(&self, patient: &Patient) -> DeliveryReport {
        let narrative = self.generator.generate(patient);

        let rendered = match report::render(patient, &narrative) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(patient_id = %patient.id, error = %e, "Report rendering failed");
                return DeliveryReport::failure(e.to_string());
            }
        };

        deliver(self.transport, patient, &rendered.bytes)
    }
}
