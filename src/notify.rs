// src/notify.rs
// Reminder email delivery over SMTP, with a simulation mode when no
// credentials are configured and an append-only local mail log.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{Result, VakilError};

#[derive(Debug, Clone)]
struct SmtpSettings {
    sender_email: String,
    sender_password: String,
    server: String,
    port: u16,
}

/// Sends reminder emails, or simulates delivery when no SMTP
/// credentials are configured. Every message is appended to the local
/// mail log whether or not the transport succeeded.
#[derive(Debug, Clone)]
pub struct Mailer {
    smtp: Option<SmtpSettings>,
    mail_log_path: PathBuf,
}

impl Mailer {
    pub fn from_config(config: &Config) -> Self {
        let smtp = match (&config.sender_email, &config.sender_password) {
            (Some(email), Some(password)) => Some(SmtpSettings {
                sender_email: email.clone(),
                sender_password: password.clone(),
                server: config.smtp_server.clone(),
                port: config.smtp_port,
            }),
            _ => None,
        };

        Self {
            smtp,
            mail_log_path: PathBuf::from(&config.mail_log_path),
        }
    }

    pub fn is_simulated(&self) -> bool {
        self.smtp.is_none()
    }

    /// Sends one email and appends it to the mail log. Transport
    /// failures are logged and swallowed, so this reports success
    /// either way.
    pub fn send_email(&self, to: &str, subject: &str, body: &str) -> bool {
        match &self.smtp {
            None => {
                info!(to, subject, "email simulation, no SMTP credentials");
                self.log_mail(to, subject, body);
                true
            }
            Some(smtp) => {
                if let Err(e) = transport_send(smtp, to, subject, body) {
                    error!(to, error = %e, "email delivery failed");
                }
                self.log_mail(to, subject, body);
                true
            }
        }
    }

    /// Sends the deadline reminder pair, one to the client and one to
    /// the lawyer.
    pub fn send_reminder_emails(
        &self,
        case_number: &str,
        client_email: &str,
        lawyer_email: &str,
        deadline: NaiveDate,
        reminder_message: &str,
    ) -> bool {
        let deadline_str = deadline.format("%B %d, %Y").to_string();
        let extra = if reminder_message.is_empty() {
            String::new()
        } else {
            format!("📝 Additional Message: {}", reminder_message)
        };

        let client_subject = format!("📅 Case {} - Deadline Reminder", case_number);
        let client_body = format!(
            "Dear Client,\n\n\
             This is a reminder regarding your case:\n\n\
             📋 Case Number: {}\n\
             📅 Deadline: {}\n\n\
             {}\n\n\
             Please ensure all required documents and actions are completed before the deadline.\n\n\
             Best regards,\n\
             Legal Assistant System\n",
            case_number, deadline_str, extra
        );

        let lawyer_subject = format!("⚖ Case {} - Deadline Reminder", case_number);
        let lawyer_body = format!(
            "Dear Lawyer,\n\n\
             This is a reminder regarding case:\n\n\
             📋 Case Number: {}\n\
             📅 Deadline: {}\n\
             👤 Client: {}\n\n\
             {}\n\n\
             Please ensure all case preparations are completed before the deadline.\n\n\
             Best regards,\n\
             Legal Assistant System\n",
            case_number, deadline_str, client_email, extra
        );

        let client_sent = self.send_email(client_email, &client_subject, &client_body);
        let lawyer_sent = self.send_email(lawyer_email, &lawyer_subject, &lawyer_body);
        client_sent && lawyer_sent
    }

    /// Appends the message to the mail log. Log trouble is reported but
    /// never changes the delivery outcome.
    fn log_mail(&self, to: &str, subject: &str, body: &str) {
        let separator = "=".repeat(50);
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.6f");
        let entry = format!(
            "\n{}\nTO: {}\nSUBJECT: {}\nBODY:\n{}\nTIME: {}\n{}\n",
            separator, to, subject, body, timestamp, separator
        );

        let appended = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.mail_log_path)
            .and_then(|mut file| file.write_all(entry.as_bytes()));

        if let Err(e) = appended {
            warn!(path = %self.mail_log_path.display(), error = %e, "failed to append mail log");
        }
    }
}

fn transport_send(smtp: &SmtpSettings, to: &str, subject: &str, body: &str) -> Result<()> {
    let from: Mailbox = smtp
        .sender_email
        .parse()
        .map_err(|e: lettre::address::AddressError| VakilError::MailError(e.to_string()))?;
    let to: Mailbox = to
        .parse()
        .map_err(|e: lettre::address::AddressError| VakilError::MailError(e.to_string()))?;

    let email = Message::builder()
        .from(from)
        .to(to)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body.to_string())
        .map_err(|e| VakilError::MailError(e.to_string()))?;

    let transport = SmtpTransport::starttls_relay(&smtp.server)
        .map_err(|e| VakilError::MailError(e.to_string()))?
        .port(smtp.port)
        .credentials(Credentials::new(
            smtp.sender_email.clone(),
            smtp.sender_password.clone(),
        ))
        .build();

    transport
        .send(&email)
        .map_err(|e| VakilError::MailError(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulated_mailer(dir: &tempfile::TempDir) -> Mailer {
        let config = Config {
            mail_log_path: dir
                .path()
                .join("sent_emails.txt")
                .to_string_lossy()
                .into_owned(),
            ..Config::default()
        };
        Mailer::from_config(&config)
    }

    fn read_log(mailer: &Mailer) -> String {
        std::fs::read_to_string(&mailer.mail_log_path).unwrap()
    }

    #[test]
    fn simulation_logs_both_reminder_emails() {
        let dir = tempfile::tempdir().unwrap();
        let mailer = simulated_mailer(&dir);
        assert!(mailer.is_simulated());

        let deadline = NaiveDate::from_ymd_opt(2026, 6, 2).unwrap();
        let sent = mailer.send_reminder_emails(
            "CRL-204/2026",
            "client@example.com",
            "lawyer@example.com",
            deadline,
            "",
        );
        assert!(sent);

        let log = read_log(&mailer);
        assert_eq!(log.matches("TO: ").count(), 2);
        assert!(log.contains("TO: client@example.com"));
        assert!(log.contains("TO: lawyer@example.com"));
        assert!(log.contains("SUBJECT: 📅 Case CRL-204/2026 - Deadline Reminder"));
        assert!(log.contains("SUBJECT: ⚖ Case CRL-204/2026 - Deadline Reminder"));
        assert!(log.contains("📅 Deadline: June 02, 2026"));
        assert_eq!(log.matches(&"=".repeat(50)).count(), 4);
    }

    #[test]
    fn optional_message_only_appears_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let mailer = simulated_mailer(&dir);
        let deadline = NaiveDate::from_ymd_opt(2026, 7, 15).unwrap();

        mailer.send_reminder_emails(
            "CIV-77/2026",
            "client@example.com",
            "lawyer@example.com",
            deadline,
            "bring the property deed",
        );
        let log = read_log(&mailer);
        assert!(log.contains("📝 Additional Message: bring the property deed"));
    }

    #[test]
    fn transport_failure_still_reports_success_and_logs() {
        // Nothing listens on port 1, so delivery always fails.
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            sender_email: Some("sender@example.com".to_string()),
            sender_password: Some("app-password".to_string()),
            smtp_server: "127.0.0.1".to_string(),
            smtp_port: 1,
            mail_log_path: dir
                .path()
                .join("sent_emails.txt")
                .to_string_lossy()
                .into_owned(),
            ..Config::default()
        };
        let mailer = Mailer::from_config(&config);
        assert!(!mailer.is_simulated());

        let sent = mailer.send_email("client@example.com", "Subject", "Body");
        assert!(sent);

        let log = read_log(&mailer);
        assert!(log.contains("TO: client@example.com"));
    }
}
