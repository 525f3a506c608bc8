use std::sync::OnceLock;

use chrono::{Local, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Timestamp format used throughout the store (`created_at`, report dates).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One patient's stored profile.
///
/// `id` uniquely identifies at most one live record; re-upserting the same
/// id replaces name/age/diagnosis/email but keeps the first insertion's
/// `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub diagnosis: String,
    pub email: String,
    pub created_at: NaiveDateTime,
}

impl Patient {
    /// Build a new record stamped with the current local time. The store
    /// keeps this timestamp only on first insertion.
    pub fn new(id: &str, name: &str, age: u32, diagnosis: &str, email: &str) -> Self {
        Self {
            id: id.trim().to_string(),
            name: name.trim().to_string(),
            age,
            diagnosis: diagnosis.trim().to_string(),
            email: email.trim().to_lowercase(),
            created_at: Local::now().naive_local(),
        }
    }

    /// Missing required fields, checked at the ingestion boundary.
    pub fn validate(&self) -> Result<(), String> {
        if self.id.is_empty() {
            return Err("patient id is empty".to_string());
        }
        if self.name.is_empty() {
            return Err("name is empty".to_string());
        }
        if self.age == 0 {
            return Err("age must be positive".to_string());
        }
        if !is_valid_email(&self.email) {
            return Err(format!("invalid email format: {}", self.email));
        }
        Ok(())
    }
}

/// Simple address-format predicate, checked before any delivery attempt.
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
            .expect("email regex is valid")
    });
    re.is_match(email)
}
