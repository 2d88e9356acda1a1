//! Transactional email delivery through the SendGrid REST API

use serde_json::json;
use thiserror::Error;

use crate::config::EmailConfig;

const SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("email delivery is not configured")]
    NotConfigured,
    #[error("email provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("email provider rejected the message with status {0}")]
    Rejected(u16),
}

pub struct Mailer {
    http: reqwest::Client,
    api_key: Option<String>,
    sender: Option<String>,
}

impl Mailer {
    pub fn from_config(config: &EmailConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            sender: config.sender.clone(),
        }
    }

    /// Send an HTML email. Returns the provider's message id when it
    /// supplies one.
    pub async fn send(&self, to: &str, subject: &str, html: &str) -> Result<String, EmailError> {
        let (api_key, sender) = match (&self.api_key, &self.sender) {
            (Some(key), Some(sender)) => (key, sender),
            _ => return Err(EmailError::NotConfigured),
        };

        let payload = json!({
            "personalizations": [{ "to": [{ "email": to }] }],
            "from": { "email": sender },
            "subject": subject,
            "content": [{ "type": "text/html", "value": html }],
        });

        let response = self
            .http
            .post(SEND_URL)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EmailError::Rejected(response.status().as_u16()));
        }

        let message_id = response
            .headers()
            .get("x-message-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        Ok(message_id)
    }
}

/// Welcome email body for freshly registered users
pub fn welcome_template(user_name: &str) -> String {
    format!(
        "<h2>Welcome to TrustNet, {user_name}!</h2>\
         <p>We're thrilled to have you onboard.</p>\
         <p>Start exploring your dashboard.</p>\
         <hr/>\
         <small>This is an automated email. Please do not reply.</small>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_mailer_reports_not_configured() {
        let mailer = Mailer::from_config(&EmailConfig {
            api_key: None,
            sender: None,
        });
        let result = mailer.send("asha@example.com", "Hi", "<p>hi</p>").await;
        assert!(matches!(result, Err(EmailError::NotConfigured)));
    }

    #[test]
    fn welcome_template_mentions_the_user() {
        let body = welcome_template("Asha");
        assert!(body.contains("Welcome to TrustNet, Asha!"));
    }
}
