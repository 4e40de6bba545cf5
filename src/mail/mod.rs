//! Outgoing email.
//!
//! SMTP is optional: without a configured host the message is logged and
//! treated as delivered, which keeps local development working without a
//! relay. Transport failures are surfaced to the caller.

mod templates;

pub use templates::otp_email;

use anyhow::Result;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::EmailConfig;
use crate::db::OtpPurpose;
use crate::i18n::Lang;

pub struct Mailer {
    config: EmailConfig,
}

impl Mailer {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_configured()
    }

    /// Send the OTP email for a purpose, localized to the request language.
    pub async fn send_otp_email(
        &self,
        to_email: &str,
        purpose: OtpPurpose,
        code: &str,
        lang: Lang,
    ) -> Result<()> {
        let (subject, body) = otp_email(purpose, code, lang);
        self.send_email(to_email, &subject, &body).await
    }

    async fn send_email(&self, to_email: &str, subject: &str, body: &str) -> Result<()> {
        if !self.is_enabled() {
            tracing::warn!(to = %to_email, subject = %subject, "SMTP not configured, logging email instead");
            tracing::debug!(body = %body, "Suppressed email body");
            return Ok(());
        }

        let smtp_host = self
            .config
            .smtp_host
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("SMTP host not configured"))?;
        let from_address = self
            .config
            .from_address
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("From address not configured"))?;

        let from_mailbox = format!("{} <{}>", self.config.from_name, from_address);
        let from: Mailbox = from_mailbox.parse()?;
        let to: Mailbox = to_email.parse()?;

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        let mailer = if self.config.smtp_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(smtp_host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(smtp_host)
        }
        .port(self.config.smtp_port);

        let mailer = if let (Some(username), Some(password)) =
            (&self.config.smtp_username, &self.config.smtp_password)
        {
            mailer.credentials(Credentials::new(username.clone(), password.clone()))
        } else {
            mailer
        };

        mailer.build().send(email).await?;

        tracing::info!(to = %to_email, subject = %subject, "Email sent successfully");

        Ok(())
    }
}
