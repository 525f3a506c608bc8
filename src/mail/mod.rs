//! Email delivery — sends one rendered report as a PDF attachment over a
//! store-and-forward relay.
//!
//! Delivery never throws: preconditions (credentials present, recipient
//! address well-formed) and transport failures all surface as a
//! [`DeliveryReport`] tagged value. Exactly one attempt per call — no
//! retry, no queuing.

pub mod deliver;
pub mod message;
pub mod transport;

pub use deliver::deliver;
pub use message::OutgoingReport;
pub use transport::{MailTransport, MockMailer, SmtpMailer};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("credentials not configured")]
    CredentialsMissing,

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("message build failed: {0}")]
    MessageBuild(String),

    #[error("SMTP transport error: {0}")]
    Transport(String),
}

/// Outcome of one delivery attempt. `ok` plus a human-readable detail; the
/// detail strings are stable and matched by callers and tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub ok: bool,
    pub detail: String,
}

impl DeliveryReport {
    pub fn sent() -> Self {
        Self {
            ok: true,
            detail: "Email sent successfully".to_string(),
        }
    }

    pub fn failure(detail: impl Into<String>) -> Self {
        Self {
            ok: false,
            detail: detail.into(),
        }
    }
}
