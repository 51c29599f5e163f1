use courier_email_contracts::{Email, EmailService};

pub use resend::{ResendEmailServiceConfig, ResendEmailServiceImpl};
pub use smtp::{SmtpEmailServiceConfig, SmtpEmailServiceImpl, SmtpSecurity};

mod http;
mod resend;
mod smtp;

/// The email transport chosen at startup.
#[derive(Debug, Clone)]
pub enum EmailServiceImpl {
    Smtp(SmtpEmailServiceImpl),
    Resend(ResendEmailServiceImpl),
}

impl From<SmtpEmailServiceImpl> for EmailServiceImpl {
    fn from(value: SmtpEmailServiceImpl) -> Self {
        Self::Smtp(value)
    }
}

impl From<ResendEmailServiceImpl> for EmailServiceImpl {
    fn from(value: ResendEmailServiceImpl) -> Self {
        Self::Resend(value)
    }
}

impl EmailService for EmailServiceImpl {
    async fn send(&self, email: Email) -> anyhow::Result<bool> {
        match self {
            Self::Smtp(smtp) => smtp.send(email).await,
            Self::Resend(resend) => resend.send(email).await,
        }
    }

    async fn ping(&self) -> anyhow::Result<()> {
        match self {
            Self::Smtp(smtp) => smtp.ping().await,
            Self::Resend(resend) => resend.ping().await,
        }
    }
}
