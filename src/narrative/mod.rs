//! Narrative generation — turns one patient record into free-text report
//! content via an external text-generation call.
//!
//! Failure policy is degrade-to-placeholder, not retry: the generator never
//! throws, encoding unavailability or call errors in-band as text so the
//! renderer always has content to place.

pub mod client;
pub mod generator;
pub mod prompt;

pub use client::{GeminiClient, MockTextGenerator, TextGenerator};
pub use generator::{NarrativeGenerator, UNCONFIGURED_NARRATIVE};
pub use prompt::build_report_prompt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NarrativeError {
    #[error("cannot reach generation service at {0}")]
    Connection(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("generation service returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to parse generation response: {0}")]
    ResponseParsing(String),

    #[error("generation response contained no text")]
    EmptyResponse,
}
