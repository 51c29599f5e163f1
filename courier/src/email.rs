use anyhow::Context;
use courier_config::{EmailConfig, EmailTransportConfig, SmtpSecurity};
use courier_email_impl::{
    EmailServiceImpl, ResendEmailServiceConfig, ResendEmailServiceImpl, SmtpEmailServiceConfig,
    SmtpEmailServiceImpl,
};

/// Set up the email transport selected in the config.
pub async fn connect(config: &EmailConfig) -> anyhow::Result<EmailServiceImpl> {
    match &config.transport {
        EmailTransportConfig::Smtp(smtp) => {
            let smtp_config = SmtpEmailServiceConfig {
                host: smtp.host.clone(),
                port: smtp.port,
                security: match smtp.security {
                    SmtpSecurity::None => courier_email_impl::SmtpSecurity::None,
                    SmtpSecurity::StartTls => courier_email_impl::SmtpSecurity::StartTls,
                    SmtpSecurity::Tls => courier_email_impl::SmtpSecurity::Tls,
                },
                username: Some(smtp.username.clone()),
                password: Some(smtp.password.clone()),
            };
            SmtpEmailServiceImpl::new(&smtp_config, config.from.clone())
                .await
                .map(Into::into)
                .context("Failed to set up smtp transport")
        }
        EmailTransportConfig::Resend(resend) => {
            let resend_config = ResendEmailServiceConfig::new(
                resend.api_key.clone(),
                resend.endpoint_override.clone(),
            );
            ResendEmailServiceImpl::new(resend_config, config.from.clone())
                .map(Into::into)
                .context("Failed to set up resend client")
        }
    }
}
