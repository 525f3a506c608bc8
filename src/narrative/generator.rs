use super::client::{GeminiClient, TextGenerator};
use super::prompt::build_report_prompt;
use crate::config::Settings;
use crate::models::Patient;

/// Placeholder narrative used when no generation service is configured.
pub const UNCONFIGURED_NARRATIVE: &str =
    "AI service unavailable. Please configure GEMINI_API_KEY in your .env file.";

/// Generation call timeout. The external service is latency-variable; the
/// orchestrator imposes no timeout of its own beyond this client setting.
const GENERATION_TIMEOUT_SECS: u64 = 120;

/// Turns one patient record into narrative text. Never fails: an absent or
/// erroring service degrades to explanatory placeholder text so rendering
/// always has content.
pub struct NarrativeGenerator {
    client: Option<Box<dyn TextGenerator>>,
}

impl NarrativeGenerator {
    pub fn new(client: Box<dyn TextGenerator>) -> Self {
        Self { client: Some(client) }
    }

    /// A generator with no backing service — every call yields the
    /// placeholder narrative.
    pub fn unconfigured() -> Self {
        Self { client: None }
    }

    /// Wire up from settings: a Gemini client when an API key is present,
    /// the unconfigured generator otherwise.
    pub fn from_settings(settings: &Settings) -> Self {
        match &settings.gemini_api_key {
            Some(key) => Self::new(Box::new(GeminiClient::new(
                key,
                &settings.gemini_model,
                GENERATION_TIMEOUT_SECS,
            ))),
            None => {
                tracing::info!("GEMINI_API_KEY unset, narrative generation degrades to placeholder");
                Self::unconfigured()
            }
        }
    }

    /// Generate narrative text for one record. Failure is encoded in-band
    /// as text; no retry, no backoff.
    pub fn generate(&self, patient: &Patient) -> String {
        let Some(client) = &self.client else {
            return UNCONFIGURED_NARRATIVE.to_string();
        };

        let prompt = build_report_prompt(patient);
        match client.generate_text(&prompt) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(patient_id = %patient.id, error = %e, "Narrative generation failed");
                format!("Error generating AI report: {e}")
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }
}
