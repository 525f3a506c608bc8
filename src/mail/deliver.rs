use chrono::Local;

use super::message::OutgoingReport;
use super::transport::MailTransport;
use super::DeliveryReport;
use crate::models::{is_valid_email, Patient};

/// Attempt one delivery of a rendered report to the patient's address.
///
/// Preconditions, checked in order before any network action:
/// 1. transport credentials present, else `(false, "credentials not configured")`;
/// 2. recipient address well-formed, else `(false, "invalid email format")`.
///
/// A transport failure becomes `(false, "Error sending email: {detail}")`;
/// success is `(true, "Email sent successfully")`. Exactly one attempt.
pub fn deliver(
    transport: &dyn MailTransport,
    patient: &Patient,
    pdf_bytes: &[u8],
) -> DeliveryReport {
    if !transport.credentials_configured() {
        return DeliveryReport::failure("credentials not configured");
    }
    if !is_valid_email(&patient.email) {
        return DeliveryReport::failure("invalid email format");
    }

    let report = OutgoingReport::for_patient(patient, pdf_bytes.to_vec(), Local::now().date_naive());
    match transport.send_report(&report) {
        Ok(()) => {
            tracing::info!(patient_id = %patient.id, recipient = %patient.email, "Report delivered");
            DeliveryReport::sent()
        }
        Err(e) => {
            tracing::warn!(patient_id = %patient.id, error = %e, "Report delivery failed");
            DeliveryReport::failure(format!("Error sending email: {e}"))
        }
    }
}
