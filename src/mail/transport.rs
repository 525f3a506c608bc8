use std::sync::Mutex;

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use super::message::OutgoingReport;
use super::MailError;
use crate::config::SmtpConfig;

/// Seam for the mail transport. Synchronous send; a failure at any stage
/// (connect, auth, protocol) surfaces as a [`MailError`].
pub trait MailTransport {
    /// Whether sender credentials are present. Checked by delivery before
    /// any network action.
    fn credentials_configured(&self) -> bool;

    fn send_report(&self, report: &OutgoingReport) -> Result<(), MailError>;
}

/// STARTTLS SMTP relay client (lettre).
pub struct SmtpMailer {
    config: SmtpConfig,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }
}

impl MailTransport for SmtpMailer {
    fn credentials_configured(&self) -> bool {
        self.config.credentials.is_some()
    }

    fn send_report(&self, report: &OutgoingReport) -> Result<(), MailError> {
        let creds = self
            .config
            .credentials
            .as_ref()
            .ok_or(MailError::CredentialsMissing)?;

        let from: Mailbox = creds
            .email
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("sender {}: {e}", creds.email)))?;
        let to: Mailbox = report
            .to
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("recipient {}: {e}", report.to)))?;

        let pdf_type = ContentType::parse("application/pdf")
            .map_err(|e| MailError::MessageBuild(e.to_string()))?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(report.subject.clone())
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(report.body.clone()))
                    .singlepart(
                        Attachment::new(report.attachment_name.clone())
                            .body(report.attachment.clone(), pdf_type),
                    ),
            )
            .map_err(|e| MailError::MessageBuild(e.to_string()))?;

        let mailer = SmtpTransport::starttls_relay(&self.config.server)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(self.config.port)
            .credentials(Credentials::new(creds.email.clone(), creds.password.clone()))
            .build();

        tracing::debug!(
            recipient = %report.to,
            server = %self.config.server,
            "Sending report email"
        );
        mailer
            .send(&message)
            .map(|_| ())
            .map_err(|e| MailError::Transport(e.to_string()))
    }
}

/// Mock transport for testing. Records sent messages and can be built
/// without credentials or set to reject specific recipients.
pub struct MockMailer {
    configured: bool,
    reject: Vec<String>,
    pub sent: Mutex<Vec<OutgoingReport>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            configured: true,
            reject: Vec::new(),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// A transport with no credentials set.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    /// Fail sends addressed to any of the given recipients.
    pub fn rejecting(addresses: &[&str]) -> Self {
        Self {
            reject: addresses.iter().map(|a| a.to_string()).collect(),
            ..Self::new()
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().expect("mock mailer lock").len()
    }
}

impl Default for MockMailer {
    fn default() -> Self {
        Self::new()
    }
}

impl MailTransport for MockMailer {
    fn credentials_configured(&self) -> bool {
        self.configured
    }

    fn send_report(&self, report: &OutgoingReport) -> Result<(), MailError> {
        if self.reject.contains(&report.to) {
            return Err(MailError::Transport(format!("relay refused {}", report.to)));
        }
        self.sent
            .lock()
            .expect("mock mailer lock")
            .push(report.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SenderCredentials;
    use chrono::NaiveDate;

    fn report_for(to: &str) -> OutgoingReport {
        let patient = crate::models::Patient::new("P1", "Jane Doe", 34, "Hypertension", to);
        OutgoingReport::for_patient(&patient, vec![1], NaiveDate::from_ymd_opt(2026, 8, 29).unwrap())
    }

    #[test]
    fn mock_records_sent_reports() {
        let mailer = MockMailer::new();
        mailer.send_report(&report_for("jane@example.com")).unwrap();
        assert_eq!(mailer.sent_count(), 1);
        assert_eq!(
            mailer.sent.lock().unwrap()[0].subject,
            "Health Report - Jane Doe"
        );
    }

    #[test]
    fn mock_rejects_configured_recipients() {
        let mailer = MockMailer::rejecting(&["bad@example.com"]);
        let err = mailer.send_report(&report_for("bad@example.com")).unwrap_err();
        assert!(matches!(err, MailError::Transport(_)));
        assert_eq!(mailer.sent_count(), 0);
    }

    #[test]
    fn mock_unconfigured_reports_no_credentials() {
        assert!(!MockMailer::unconfigured().credentials_configured());
        assert!(MockMailer::new().credentials_configured());
    }

    #[test]
    fn smtp_mailer_without_credentials_is_unconfigured() {
        let mailer = SmtpMailer::new(SmtpConfig::default());
        assert!(!mailer.credentials_configured());
    }

    #[test]
    fn smtp_mailer_with_credentials_is_configured() {
        let mailer = SmtpMailer::new(SmtpConfig {
            credentials: Some(SenderCredentials {
                email: "sender@example.com".to_string(),
                password: "app-password".to_string(),
            }),
            ..SmtpConfig::default()
        });
        assert!(mailer.credentials_configured());
    }

    #[test]
    fn smtp_send_without_credentials_errors_before_network() {
        let mailer = SmtpMailer::new(SmtpConfig::default());
        let err = mailer.send_report(&report_for("jane@example.com")).unwrap_err();
        assert!(matches!(err, MailError::CredentialsMissing));
    }
}
