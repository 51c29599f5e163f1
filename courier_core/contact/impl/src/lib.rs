use std::sync::Arc;

use courier_core_contact_contracts::{ContactSendMessageError, ContactService};
use courier_email_contracts::{ContentType, Email, EmailService};
use courier_models::{contact::ContactSubmission, email_address::EmailAddressWithName};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ContactServiceImpl<Email> {
    email: Email,
    config: ContactServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ContactServiceConfig {
    pub recipient: Arc<EmailAddressWithName>,
}

impl<Email> ContactServiceImpl<Email> {
    pub fn new(email: Email, config: ContactServiceConfig) -> Self {
        Self { email, config }
    }
}

impl<EmailS> ContactService for ContactServiceImpl<EmailS>
where
    EmailS: EmailService,
{
    async fn send_message(&self, submission: ContactSubmission) -> Result<(), ContactSendMessageError> {
        let email = Email {
            recipient: (*self.config.recipient).clone(),
            subject: format!("Contato via Portfolio - {}", *submission.name),
            body: render_body(&submission),
            content_type: ContentType::Html,
            reply_to: Some(submission.email.into()),
        };

        debug!(recipient = %email.recipient, "sending contact message");

        if !self.email.send(email).await? {
            return Err(ContactSendMessageError::Send);
        }

        Ok(())
    }
}

/// Renders the html body of a contact email. Line breaks in the message become
/// `<br>` tags, everything else is embedded as submitted.
fn render_body(submission: &ContactSubmission) -> String {
    format!(
        "<h2>Nova mensagem do Portfolio</h2>\n\
         <p><strong>Nome:</strong> {name}</p>\n\
         <p><strong>Email:</strong> {email}</p>\n\
         <hr />\n\
         <p><strong>Mensagem:</strong></p>\n\
         <p>{message}</p>\n",
        name = *submission.name,
        email = submission.email,
        message = submission.message.replace('\n', "<br>"),
    )
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use courier_email_contracts::MockEmailService;
    use courier_models::contact::{ContactMessageContent, ContactName};
    use courier_utils::assert_matches;
    use pretty_assertions::assert_eq;

    use super::*;

    const EXPECTED_BODY: &str = "<h2>Nova mensagem do Portfolio</h2>\n\
                                 <p><strong>Nome:</strong> Ana</p>\n\
                                 <p><strong>Email:</strong> ana@example.com</p>\n\
                                 <hr />\n\
                                 <p><strong>Mensagem:</strong></p>\n\
                                 <p>Hello<br>World</p>\n";

    fn make_config() -> ContactServiceConfig {
        ContactServiceConfig {
            recipient: Arc::new("portfolio@example.com".parse().unwrap()),
        }
    }

    fn make_submission(message: &str) -> ContactSubmission {
        ContactSubmission {
            name: ContactName::try_new("Ana").unwrap(),
            email: "ana@example.com".parse().unwrap(),
            message: ContactMessageContent::new(message),
        }
    }

    fn make_email(config: &ContactServiceConfig) -> Email {
        Email {
            recipient: (*config.recipient).clone(),
            subject: "Contato via Portfolio - Ana".into(),
            body: EXPECTED_BODY.into(),
            content_type: ContentType::Html,
            reply_to: Some("ana@example.com".parse().unwrap()),
        }
    }

    #[tokio::test]
    async fn ok() {
        // Arrange
        let config = make_config();
        let email = MockEmailService::new().with_send(make_email(&config), true);
        let sut = ContactServiceImpl::new(email, config);

        // Act
        let result = sut.send_message(make_submission("Hello\nWorld")).await;

        // Assert
        result.unwrap();
    }

    #[tokio::test]
    async fn rejected() {
        // Arrange
        let config = make_config();
        let email = MockEmailService::new().with_send(make_email(&config), false);
        let sut = ContactServiceImpl::new(email, config);

        // Act
        let result = sut.send_message(make_submission("Hello\nWorld")).await;

        // Assert
        assert_matches!(result, Err(ContactSendMessageError::Send));
    }

    #[tokio::test]
    async fn provider_error() {
        // Arrange
        let config = make_config();
        let email = MockEmailService::new()
            .with_send_error(make_email(&config), anyhow!("connection refused"));
        let sut = ContactServiceImpl::new(email, config);

        // Act
        let result = sut.send_message(make_submission("Hello\nWorld")).await;

        // Assert
        assert_matches!(result, Err(ContactSendMessageError::Other(err)) if err.to_string() == "connection refused");
    }

    #[test]
    fn body_replaces_only_newlines() {
        let submission = ContactSubmission {
            name: ContactName::try_new("<b>Ana & Co</b>").unwrap(),
            email: "ana@example.com".parse().unwrap(),
            message: ContactMessageContent::new("a < b\n\n  c > d\r\nend"),
        };

        let body = render_body(&submission);

        assert!(body.contains("<p><strong>Nome:</strong> <b>Ana & Co</b></p>"));
        assert!(body.contains("<p><strong>Email:</strong> ana@example.com</p>"));
        assert!(body.contains("<p>a < b<br><br>  c > d\r<br>end</p>"));
    }

    #[test]
    fn body_without_newlines() {
        let body = render_body(&make_submission("single line"));

        assert!(body.contains("<p>single line</p>"));
        assert!(!body.contains("<br>"));
    }
}
