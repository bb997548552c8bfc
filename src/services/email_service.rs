/// Outgoing mail for account lifecycle events
use std::sync::Arc;

use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::{info, warn};

use crate::config::EmailConfig;
use crate::error::{AppError, Result};

/// SMTP relay, or a no-op that only logs when no relay is configured.
#[derive(Clone)]
pub struct EmailService {
    transport: Option<Arc<AsyncSmtpTransport<Tokio1Executor>>>,
    from: Mailbox,
    verification_base_url: Option<String>,
    password_reset_base_url: Option<String>,
}

impl EmailService {
    pub fn new(config: &EmailConfig) -> Result<Self> {
        let from = config
            .smtp_from
            .parse::<Mailbox>()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid SMTP from address: {}", e)))?;

        let transport = if config.smtp_host.trim().is_empty() {
            warn!("SMTP host not configured; email service will operate in no-op mode");
            None
        } else {
            let builder = if config.use_starttls {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            }
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to configure SMTP transport: {}", e))
            })?
            .port(config.smtp_port);

            let builder = match (&config.smtp_username, &config.smtp_password) {
                (Some(username), Some(password)) => {
                    builder.credentials(Credentials::new(username.clone(), password.clone()))
                }
                _ => builder,
            };

            Some(Arc::new(builder.build()))
        };

        Ok(Self {
            transport,
            from,
            verification_base_url: config.verification_base_url.clone(),
            password_reset_base_url: config.password_reset_base_url.clone(),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    pub async fn send_registration(&self, recipient: &str, full_name: &str, token: &str) -> Result<()> {
        let link = self.verification_link(recipient, token);
        let body = format!(
            "Hi {full_name},\n\n\
             Welcome to Quill! Confirm your email address to activate your account:\n{link}\n\n\
             Your verification code is: {token}\n\n\
             If you did not sign up, you can ignore this email."
        );
        self.send_mail(recipient, "Welcome to Quill", &body).await
    }

    pub async fn send_email_confirmed(&self, recipient: &str, full_name: &str) -> Result<()> {
        let body = format!(
            "Hi {full_name},\n\nYour email address has been confirmed. Happy writing!"
        );
        self.send_mail(recipient, "Email Confirmed", &body).await
    }

    pub async fn send_forgot_password(&self, recipient: &str, full_name: &str, token: &str) -> Result<()> {
        let link = self.password_reset_link(recipient, token);
        let body = format!(
            "Hi {full_name},\n\n\
             We received a request to reset your password. Use the link below to choose a new one:\n{link}\n\n\
             Your reset code is: {token}\n\n\
             If you did not request this, you can ignore this email."
        );
        self.send_mail(recipient, "Reset Password", &body).await
    }

    pub async fn send_password_reset(&self, recipient: &str, full_name: &str) -> Result<()> {
        let body = format!(
            "Hi {full_name},\n\n\
             Your password was just reset. If this wasn't you, contact support immediately."
        );
        self.send_mail(recipient, "Password Reset Successful", &body).await
    }

    fn verification_link(&self, email: &str, token: &str) -> String {
        let base = match &self.verification_base_url {
            Some(base) if !base.is_empty() => base.as_str(),
            _ => "https://quill.dev/confirm-email",
        };
        account_link(base, email, token)
    }

    fn password_reset_link(&self, email: &str, token: &str) -> String {
        let base = match &self.password_reset_base_url {
            Some(base) if !base.is_empty() => base.as_str(),
            _ => "https://quill.dev/reset-password",
        };
        account_link(base, email, token)
    }

    async fn send_mail(&self, recipient: &str, subject: &str, body: &str) -> Result<()> {
        let Some(transport) = &self.transport else {
            info!(
                subject,
                recipient, "Email service running in no-op mode; skipping actual send"
            );
            return Ok(());
        };

        let to = recipient.parse::<Mailbox>().map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Invalid recipient email address: {}", e))
        })?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(header::ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build email message: {}", e)))?;

        transport
            .send(email)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to send email: {}", e)))?;
        info!(subject, "email sent successfully");

        Ok(())
    }
}

fn account_link(base: &str, email: &str, token: &str) -> String {
    format!(
        "{base}?email={}&token={}",
        urlencoding::encode(email),
        urlencoding::encode(token)
    )
}

/// Mail is best effort: a failed send is logged and the request carries on.
pub(crate) fn log_send_failure(result: Result<()>, recipient: &str) {
    if let Err(e) = result {
        warn!(recipient, error = %e, "failed to send email");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[tokio::test]
    async fn no_op_mode_sends_nothing() {
        let service = EmailService::new(&Config::for_memory("x").email).unwrap();
        assert!(!service.is_enabled());
        service
            .send_registration("someone@example.com", "Someone", "abc")
            .await
            .unwrap();
    }

    #[test]
    fn invalid_from_address_is_rejected() {
        let mut config = Config::for_memory("x").email;
        config.smtp_from = "not an address".to_string();
        assert!(EmailService::new(&config).is_err());
    }

    #[test]
    fn links_use_configured_base() {
        let mut config = Config::for_memory("x").email;
        config.verification_base_url = Some("https://blog.test/verify".to_string());
        let service = EmailService::new(&config).unwrap();

        assert_eq!(
            service.verification_link("a@b.c", "t0k"),
            "https://blog.test/verify?email=a%40b.c&token=t0k"
        );
        assert!(service
            .password_reset_link("a@b.c", "t0k")
            .starts_with("https://quill.dev/reset-password"));
    }

    #[test]
    fn link_query_is_percent_encoded() {
        let service = EmailService::new(&Config::for_memory("x").email).unwrap();
        let link = service.verification_link("a+b@x.com", "t0k");
        assert_eq!(
            link,
            "https://quill.dev/confirm-email?email=a%2Bb%40x.com&token=t0k"
        );

        let query = link.split_once('?').unwrap().1;
        let email = query
            .split('&')
            .find_map(|pair| pair.strip_prefix("email="))
            .unwrap();
        assert_eq!(urlencoding::decode(email).unwrap(), "a+b@x.com");
    }
}
