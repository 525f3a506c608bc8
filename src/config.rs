use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Careport";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default Gemini model for narrative generation.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-exp";

/// Default SMTP relay when SMTP_SERVER is unset.
pub const DEFAULT_SMTP_SERVER: &str = "smtp.gmail.com";

/// Default SMTP submission port (STARTTLS).
pub const DEFAULT_SMTP_PORT: u16 = 587;

pub fn default_log_filter() -> String {
    format!("{}=info", env!("CARGO_PKG_NAME"))
}

/// Get the application data directory
/// ~/Careport/ on all platforms (user-visible, next to the user's documents)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Careport")
}

/// Default location of the patient database.
pub fn default_db_path() -> PathBuf {
    app_data_dir().join("careport.db")
}

/// SMTP sender credentials. Absence is a valid, detectable state — delivery
/// reports "credentials not configured" instead of attempting the network.
#[derive(Debug, Clone)]
pub struct SenderCredentials {
    pub email: String,
    pub password: String,
}

/// SMTP relay configuration.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub credentials: Option<SenderCredentials>,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SMTP_SERVER.to_string(),
            port: DEFAULT_SMTP_PORT,
            credentials: None,
        }
    }
}

/// Runtime settings read from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    /// API key for the narrative service. None = not configured (valid state).
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub smtp: SmtpConfig,
}

impl Settings {
    /// Load a `.env` file if present, then read settings from the environment.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Read settings from the process environment. Empty values count as unset.
    pub fn from_env() -> Self {
        let credentials = match (env_nonempty("SENDER_EMAIL"), env_nonempty("SENDER_PASSWORD")) {
            (Some(email), Some(password)) => Some(SenderCredentials { email, password }),
            _ => None,
        };

        Self {
            gemini_api_key: env_nonempty("GEMINI_API_KEY"),
            gemini_model: env_nonempty("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            smtp: SmtpConfig {
                server: env_nonempty("SMTP_SERVER")
                    .unwrap_or_else(|| DEFAULT_SMTP_SERVER.to_string()),
                port: env_nonempty("SMTP_PORT")
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(DEFAULT_SMTP_PORT),
                credentials,
            },
        }
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("Careport"));
    }

    #[test]
    fn default_db_path_under_app_data() {
        let db = default_db_path();
        assert!(db.starts_with(app_data_dir()));
        assert!(db.ends_with("careport.db"));
    }

    #[test]
    fn app_name_is_careport() {
        assert_eq!(APP_NAME, "Careport");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn smtp_defaults() {
        let smtp = SmtpConfig::default();
        assert_eq!(smtp.server, "smtp.gmail.com");
        assert_eq!(smtp.port, 587);
        assert!(smtp.credentials.is_none());
    }
}
