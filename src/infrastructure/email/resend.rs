//! Transactional email via the Resend HTTP API

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::DomainError;

use super::{EmailMessage, Mailer};

const RESEND_API_URL: &str = "https://api.resend.com";

/// Mailer backed by Resend
#[derive(Debug)]
pub struct ResendMailer {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    from_address: String,
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

impl ResendMailer {
    pub fn new(api_key: impl Into<String>, from_address: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: RESEND_API_URL.to_string(),
            api_key: api_key.into(),
            from_address: from_address.into(),
        }
    }

    /// Override the API base URL (integration tests)
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), DomainError> {
        let request = SendEmailRequest {
            from: &self.from_address,
            to: &message.to,
            subject: &message.subject,
            html: &message.html,
        };

        let response = self
            .http
            .post(format!("{}/emails", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::email(format!("Failed to reach email API: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "Email API rejected message");
            return Err(DomainError::email(format!(
                "Email API returned {}: {}",
                status, body
            )));
        }

        info!(to = %message.to, subject = %message.subject, "Sent email");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{bearer_token, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_send_posts_to_emails_endpoint() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(bearer_token("re_test_key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "email-1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mailer = ResendMailer::new("re_test_key", "noreply@example.com")
            .with_api_url(server.uri());

        let message = EmailMessage {
            to: "user@example.com".to_string(),
            subject: "Verify your email".to_string(),
            html: "<p>hi</p>".to_string(),
        };

        mailer.send(&message).await.unwrap();
    }

    #[tokio::test]
    async fn test_send_surfaces_api_errors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(422))
            .mount(&server)
            .await;

        let mailer =
            ResendMailer::new("re_test_key", "noreply@example.com").with_api_url(server.uri());

        let message = EmailMessage {
            to: "user@example.com".to_string(),
            subject: "Subject".to_string(),
            html: "<p>hi</p>".to_string(),
        };

        assert!(mailer.send(&message).await.is_err());
    }
}
