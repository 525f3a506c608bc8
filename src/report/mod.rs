//! Report rendering — one patient record plus narrative text in, one
//! self-contained PDF byte stream out.
//!
//! The layout is expressed as an ordered list of typed content blocks
//! ([`blocks::Block`]) which a separate module renders to paginated A4.
//! Rendering is pure given its inputs: no I/O, and any well-formed record
//! with any narrative text (including empty) produces a document.

pub mod blocks;
pub mod layout;
pub mod pdf;

pub use blocks::Block;
pub use layout::{report_blocks, split_paragraphs, DISCLAIMER};

use chrono::{Local, NaiveDateTime};
use thiserror::Error;

use crate::models::Patient;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("PDF font error: {0}")]
    Font(String),

    #[error("PDF write error: {0}")]
    Write(String),
}

/// A rendered report: opaque bytes plus the display filename used for
/// attachments and manual downloads.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Deterministic attachment filename for one patient's report.
pub fn attachment_filename(patient_id: &str) -> String {
    format!("Health_Report_{patient_id}.pdf")
}

/// Render a report stamped with the current local time.
pub fn render(patient: &Patient, narrative: &str) -> Result<RenderedReport, ReportError> {
    render_at(patient, narrative, Local::now().naive_local())
}

/// Render a report with an explicit generation timestamp (pure given its
/// inputs; `render` is the now-stamped convenience wrapper).
pub fn render_at(
    patient: &Patient,
    narrative: &str,
    generated_at: NaiveDateTime,
) -> Result<RenderedReport, ReportError> {
    let blocks = report_blocks(patient, narrative, generated_at);
    let bytes = pdf::render_blocks("HEALTH REPORT", &blocks)?;
    Ok(RenderedReport {
        filename: attachment_filename(&patient.id),
        bytes,
    })
}
