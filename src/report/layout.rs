use chrono::NaiveDateTime;

use super::blocks::Block;
use crate::models::Patient;

/// Fixed disclaimer footer on every report.
pub const DISCLAIMER: &str = "This report was generated by Careport. \
Please consult with your healthcare provider for professional medical advice.";

/// Build the fixed-order block list for one report: title, record field
/// table, one paragraph per narrative segment, disclaimer footer.
pub fn report_blocks(patient: &Patient, narrative: &str, generated_at: NaiveDateTime) -> Vec<Block> {
    let mut blocks = vec![
        Block::Title("HEALTH REPORT".to_string()),
        Block::Spacer(6.0),
        Block::Heading("Patient Information".to_string()),
        Block::Table(vec![
            ("Patient ID:".to_string(), patient.id.clone()),
            ("Name:".to_string(), patient.name.clone()),
            ("Age:".to_string(), format!("{} years", patient.age)),
            ("Email:".to_string(), patient.email.clone()),
            ("Diagnosis:".to_string(), patient.diagnosis.clone()),
            (
                "Report Date:".to_string(),
                generated_at.format("%Y-%m-%d %H:%M").to_string(),
            ),
        ]),
        Block::Spacer(8.0),
        Block::Heading("Medical Analysis & Recommendations".to_string()),
    ];

    for paragraph in split_paragraphs(narrative) {
        blocks.push(Block::Paragraph(paragraph));
    }

    blocks.push(Block::Spacer(10.0));
    blocks.push(Block::Footer(DISCLAIMER.to_string()));
    blocks
}

/// Segment narrative text into paragraphs at blank-line boundaries.
/// Empty segments are dropped; an empty input yields no paragraphs.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.trim().is_empty() {
                paragraphs.push(current.trim().to_string());
            }
            current.clear();
        } else {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        }
    }
    if !current.trim().is_empty() {
        paragraphs.push(current.trim().to_string());
    }
    paragraphs
}
