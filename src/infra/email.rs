//! Email dispatch.
//!
//! SMTP settings come from the environment. When no SMTP host is
//! configured (development), messages are logged instead of sent.

use async_trait::async_trait;
use std::env;

use crate::errors::AppResult;

/// Email dispatch abstraction, trait-based so tests can capture sends
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()>;
}

/// Email configuration from environment.
struct EmailConfig {
    smtp_host: Option<String>,
    smtp_from: String,
}

impl EmailConfig {
    fn from_env() -> Self {
        Self {
            smtp_host: env::var("SMTP_HOST").ok(),
            smtp_from: env::var("SMTP_FROM").unwrap_or_else(|_| "noreply@example.com".to_string()),
        }
    }

    fn is_configured(&self) -> bool {
        self.smtp_host.is_some()
    }
}

/// Default mailer. Logs messages when SMTP is not configured.
pub struct SmtpMailer;

impl SmtpMailer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SmtpMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let config = EmailConfig::from_env();

        tracing::info!(to = %to, from = %config.smtp_from, subject = %subject, "Dispatching email");

        if !config.is_configured() {
            // Development mode: log the email instead of sending
            tracing::info!(
                "=== EMAIL (not sent) ===\n\
                 From: {}\n\
                 To: {}\n\
                 Subject: {}\n\
                 Body:\n{}\n\
                 ========================",
                config.smtp_from,
                to,
                subject,
                body
            );
            return Ok(());
        }

        // No SMTP transport is compiled into this build; log loudly so the
        // misconfiguration is visible instead of silently dropping mail.
        tracing::warn!(
            to = %to,
            "SMTP_HOST is set but no SMTP transport is available; logging message instead"
        );
        tracing::info!(subject = %subject, body = %body, "Email content");
        Ok(())
    }
}
