use chrono::NaiveDate;

use crate::models::Patient;
use crate::report::attachment_filename;

/// One outgoing report email: fixed subject and body templates
/// interpolating the patient name and send date, plus the PDF attachment
/// under its deterministic filename.
#[derive(Debug, Clone)]
pub struct OutgoingReport {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachment_name: String,
    pub attachment: Vec<u8>,
}

impl OutgoingReport {
    pub fn for_patient(patient: &Patient, pdf_bytes: Vec<u8>, send_date: NaiveDate) -> Self {
        Self {
            to: patient.email.clone(),
            subject: format!("Health Report - {}", patient.name),
            body: format!(
                "Dear {name},\n\n\
                 Please find attached your health report generated on {date}.\n\n\
                 This report contains important information about your health status \
                 and recommendations for your wellbeing.\n\n\
                 If you have any questions about this report, please consult with your \
                 healthcare provider.\n\n\
                 Best regards,\n\
                 Careport",
                name = patient.name,
                date = send_date.format("%Y-%m-%d"),
            ),
            attachment_name: attachment_filename(&patient.id),
            attachment: pdf_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient() -> Patient {
        Patient::new("P1", "Jane Doe", 34, "Hypertension", "jane@example.com")
    }

    fn send_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 29).unwrap()
    }

    #[test]
    fn subject_follows_fixed_pattern() {
        let msg = OutgoingReport::for_patient(&patient(), vec![1, 2, 3], send_date());
        assert_eq!(msg.subject, "Health Report - Jane Doe");
    }

    #[test]
    fn body_interpolates_name_and_date() {
        let msg = OutgoingReport::for_patient(&patient(), vec![], send_date());
        assert!(msg.body.starts_with("Dear Jane Doe,"));
        assert!(msg.body.contains("generated on 2026-08-29"));
        assert!(msg.body.contains("healthcare provider"));
    }

    #[test]
    fn attachment_uses_deterministic_filename() {
        let msg = OutgoingReport::for_patient(&patient(), vec![0xFF], send_date());
        assert_eq!(msg.attachment_name, "Health_Report_P1.pdf");
        assert_eq!(msg.attachment, vec![0xFF]);
        assert_eq!(msg.to, "jane@example.com");
    }
}
