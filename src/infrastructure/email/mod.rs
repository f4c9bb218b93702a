//! Transactional email infrastructure
//!
//! Message bodies live here too; they are small HTML fragments, not a
//! template system.

mod resend;

use async_trait::async_trait;
use std::fmt::Debug;
use tracing::info;

use crate::domain::DomainError;

pub use resend::ResendMailer;

/// A rendered transactional email
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Outbound mail delivery
#[async_trait]
pub trait Mailer: Send + Sync + Debug {
    async fn send(&self, message: &EmailMessage) -> Result<(), DomainError>;
}

/// Mailer used when no email provider is configured: logs and drops.
#[derive(Debug, Default)]
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), DomainError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            "Email provider not configured, dropping message"
        );
        Ok(())
    }
}

fn button_html(label: &str, url: &str) -> String {
    format!(
        r#"<p style="margin: 30px 0;">
    <a href="{url}" style="background-color: #2563eb; color: white; padding: 12px 24px; text-decoration: none; border-radius: 6px; display: inline-block;">{label}</a>
</p>
<p>Or copy and paste this link into your browser:</p>
<p style="color: #666; word-break: break-all;">{url}</p>"#
    )
}

fn wrap_html(body: &str) -> String {
    format!(
        r#"<html>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; padding: 20px;">
{body}
</body>
</html>"#
    )
}

/// Verification link email
pub fn verification_email(to: &str, verification_url: &str) -> EmailMessage {
    let body = format!(
        "<h2>Verify your email address</h2>\n\
         <p>Click the button below to verify your email address and activate your account:</p>\n{}\n\
         <p style=\"color: #999; font-size: 12px;\">If you didn't create an account, you can safely ignore this email.</p>",
        button_html("Verify Email", verification_url)
    );

    EmailMessage {
        to: to.to_string(),
        subject: "Verify your email - Cardlink".to_string(),
        html: wrap_html(&body),
    }
}

/// Password reset link email
pub fn password_reset_email(to: &str, reset_url: &str) -> EmailMessage {
    let body = format!(
        "<h2>Reset your password</h2>\n\
         <p>Click the button below to reset your password:</p>\n{}\n\
         <p style=\"color: #999;\">This link will expire in 1 hour.</p>\n\
         <p style=\"color: #999; font-size: 12px;\">If you didn't request a password reset, you can safely ignore this email.</p>",
        button_html("Reset Password", reset_url)
    );

    EmailMessage {
        to: to.to_string(),
        subject: "Reset your password - Cardlink".to_string(),
        html: wrap_html(&body),
    }
}

/// Welcome email sent after verification
pub fn welcome_email(to: &str, dashboard_url: &str, monthly_limit: u32) -> EmailMessage {
    let body = format!(
        "<h2>Welcome to Cardlink!</h2>\n\
         <p>Your email has been verified and your account is ready to use.</p>\n\
         <p>You're on the <strong>Free tier</strong> which includes {} social cards per month.</p>\n{}",
        monthly_limit,
        button_html("Go to Dashboard", dashboard_url)
    );

    EmailMessage {
        to: to.to_string(),
        subject: "Welcome to Cardlink".to_string(),
        html: wrap_html(&body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_email_contains_url() {
        let message = verification_email("a@b.co", "https://cards.example.com/verify/tok");

        assert_eq!(message.to, "a@b.co");
        assert!(message.subject.contains("Verify"));
        assert!(message.html.contains("https://cards.example.com/verify/tok"));
    }

    #[test]
    fn test_welcome_email_mentions_limit() {
        let message = welcome_email("a@b.co", "https://cards.example.com/dashboard", 5);
        assert!(message.html.contains("5 social cards per month"));
    }
}
