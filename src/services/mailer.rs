use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

/// Errors that can occur when sending mail
#[derive(Debug, Error)]
pub enum MailerError {
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("Invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),
}

/// Mail relay contract
///
/// Delivers one outbound email given a subject and a plain-text body.
/// The production implementation speaks authenticated SMTPS; tests
/// substitute recording stubs.
#[async_trait]
pub trait MailRelay: Send + Sync {
    async fn deliver(&self, subject: &str, body: &str) -> Result<(), MailerError>;
}

/// SMTP mailer
///
/// Sends from the configured account to itself over implicit TLS
/// (port 465 unless overridden), the transport Gmail app passwords
/// expect. The connection pool is kept inside the lettre transport.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    mailbox: Mailbox,
}

impl SmtpMailer {
    /// Create a mailer for the given relay host and account
    pub fn new(
        host: &str,
        port: Option<u16>,
        address: &str,
        password: &str,
    ) -> Result<Self, MailerError> {
        let mailbox: Mailbox = address.parse()?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
            .credentials(Credentials::new(address.to_string(), password.to_string()));
        if let Some(port) = port {
            builder = builder.port(port);
        }

        Ok(Self {
            transport: builder.build(),
            mailbox,
        })
    }
}

#[async_trait]
impl MailRelay for SmtpMailer {
    async fn deliver(&self, subject: &str, body: &str) -> Result<(), MailerError> {
        let email = Message::builder()
            .from(self.mailbox.clone())
            .to(self.mailbox.clone())
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        self.transport.send(email).await?;

        tracing::debug!("Delivered email to {}", self.mailbox.email);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mailer_creation() {
        let mailer = SmtpMailer::new("smtp.gmail.com", None, "owner@example.com", "app-password");
        assert!(mailer.is_ok());
    }

    #[test]
    fn test_mailer_rejects_invalid_address() {
        let mailer = SmtpMailer::new("smtp.gmail.com", None, "not an address", "app-password");
        assert!(matches!(mailer, Err(MailerError::Address(_))));
    }

    #[tokio::test]
    #[ignore = "Requires live SMTP credentials"]
    async fn test_live_delivery() {
        let address = std::env::var("EMAIL_ADDRESS").expect("EMAIL_ADDRESS not set");
        let password = std::env::var("EMAIL_PASSWORD").expect("EMAIL_PASSWORD not set");

        let mailer = SmtpMailer::new("smtp.gmail.com", None, &address, &password).unwrap();
        mailer
            .deliver("Test message", "Sent from the test suite")
            .await
            .unwrap();
    }
}
