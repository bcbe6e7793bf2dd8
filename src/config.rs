// src/config.rs
// Environment-backed runtime configuration.

use std::env;

pub const DEFAULT_DATABASE_PATH: &str = "users.db";
pub const DEFAULT_MAIL_LOG_PATH: &str = "sent_emails.txt";
const DEFAULT_SMTP_SERVER: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;

/// Runtime configuration read once at startup.
///
/// Missing optional keys degrade the matching feature instead of aborting:
/// no Groq key means offline fallback answers, no OCR key means scanned
/// PDFs yield empty text, and missing SMTP credentials switch mail into
/// simulation mode.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub groq_api_key: Option<String>,
    pub ocr_api_key: Option<String>,
    pub sender_email: Option<String>,
    pub sender_password: Option<String>,
    pub smtp_server: String,
    pub smtp_port: u16,
    pub mail_log_path: String,
}

impl Config {
    pub fn from_env() -> Self {
        let smtp_port = env::var("SMTP_PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(DEFAULT_SMTP_PORT);

        Self {
            database_path: env::var("VAKIL_DB_PATH")
                .unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string()),
            groq_api_key: non_empty(env::var("GROQ_API_KEY").ok()),
            ocr_api_key: non_empty(env::var("OCR_SPACE_API_KEY").ok()),
            sender_email: non_empty(env::var("SENDER_EMAIL").ok()),
            sender_password: non_empty(env::var("SENDER_PASSWORD").ok()),
            smtp_server: env::var("SMTP_SERVER")
                .unwrap_or_else(|_| DEFAULT_SMTP_SERVER.to_string()),
            smtp_port,
            mail_log_path: DEFAULT_MAIL_LOG_PATH.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            groq_api_key: None,
            ocr_api_key: None,
            sender_email: None,
            sender_password: None,
            smtp_server: DEFAULT_SMTP_SERVER.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            mail_log_path: DEFAULT_MAIL_LOG_PATH.to_string(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_count_as_missing() {
        assert_eq!(non_empty(Some("   ".to_string())), None);
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(None), None);
        assert_eq!(
            non_empty(Some("gsk_abc".to_string())),
            Some("gsk_abc".to_string())
        );
    }

    #[test]
    fn default_config_runs_in_simulation_mode() {
        let config = Config::default();
        assert!(config.sender_email.is_none());
        assert!(config.sender_password.is_none());
        assert_eq!(config.smtp_server, "smtp.gmail.com");
        assert_eq!(config.smtp_port, 587);
        assert_eq!(config.database_path, "users.db");
        assert_eq!(config.mail_log_path, "sent_emails.txt");
    }
}
