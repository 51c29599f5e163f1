use std::sync::Arc;

use courier_email_contracts::{ContentType, Email, EmailService};
use courier_models::{email_address::EmailAddressWithName, Sensitive};
use serde::Serialize;
use tracing::error;
use url::Url;

use crate::http::HttpClient;

const SEND_ENDPOINT: &str = "https://api.resend.com/emails";

/// Sends emails through the Resend HTTP API.
#[derive(Debug, Clone)]
pub struct ResendEmailServiceImpl {
    from: EmailAddressWithName,
    config: ResendEmailServiceConfig,
    client: HttpClient,
}

#[derive(Debug, Clone)]
pub struct ResendEmailServiceConfig {
    api_key: Arc<Sensitive<String>>,
    send_endpoint: Arc<Url>,
}

impl ResendEmailServiceConfig {
    pub fn new(api_key: Sensitive<String>, send_endpoint_override: Option<Url>) -> Self {
        let send_endpoint = match send_endpoint_override {
            Some(endpoint) => endpoint,
            None => SEND_ENDPOINT
                .parse()
                .expect("default resend endpoint is a valid url"),
        };

        Self {
            api_key: api_key.into(),
            send_endpoint: send_endpoint.into(),
        }
    }
}

impl ResendEmailServiceImpl {
    pub fn new(config: ResendEmailServiceConfig, from: EmailAddressWithName) -> anyhow::Result<Self> {
        Ok(Self {
            from,
            config,
            client: HttpClient::new()?,
        })
    }
}

impl EmailService for ResendEmailServiceImpl {
    async fn send(&self, email: Email) -> anyhow::Result<bool> {
        let (html, text) = match email.content_type {
            ContentType::Html => (Some(email.body.as_str()), None),
            ContentType::Text => (None, Some(email.body.as_str())),
        };

        let request = SendEmailRequest {
            from: self.from.to_string(),
            to: [email.recipient.to_string()],
            subject: &email.subject,
            html,
            text,
            reply_to: email.reply_to.as_ref().map(ToString::to_string),
        };

        let response = self
            .client
            .post((*self.config.send_endpoint).clone())
            .bearer_auth(&**self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(true);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|err| format!("<unreadable body: {err}>"));
        error!(%status, %body, "Resend did not accept the email");

        Ok(false)
    }

    /// Resend has no endpoint to validate an api key without sending an email,
    /// so there is nothing to check ahead of time.
    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: String,
    to: [String; 1],
    subject: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<String>,
}
