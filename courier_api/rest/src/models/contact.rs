use courier_models::{
    contact::{ContactMessageContent, ContactName, ContactSubmission},
    email_address::EmailAddress,
};
use serde::{Deserialize, Serialize};

/// Request body of a contact form submission.
///
/// All fields are optional here so that every missing field can be reported at
/// once instead of failing on the first one.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiContactSubmission {
    /// Name of the person contacting us
    pub name: Option<String>,
    /// Address replies should be sent to
    pub email: Option<String>,
    /// Content of the message
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiFieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl ApiFieldError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }

    fn missing(field: &'static str) -> Self {
        Self::new(field, "field required")
    }
}

impl TryFrom<ApiContactSubmission> for ContactSubmission {
    type Error = Vec<ApiFieldError>;

    fn try_from(value: ApiContactSubmission) -> Result<Self, Self::Error> {
        let mut errors = Vec::new();

        let name = match value.name.map(ContactName::try_new) {
            Some(Ok(name)) => Some(name),
            Some(Err(_)) => {
                errors.push(ApiFieldError::new("name", "must not be empty"));
                None
            }
            None => {
                errors.push(ApiFieldError::missing("name"));
                None
            }
        };

        let email = match value.email.map(|email| email.parse::<EmailAddress>()) {
            Some(Ok(email)) => Some(email),
            Some(Err(_)) => {
                errors.push(ApiFieldError::new("email", "must be a valid email address"));
                None
            }
            None => {
                errors.push(ApiFieldError::missing("email"));
                None
            }
        };

        let message = value.message.map(ContactMessageContent::new);
        if message.is_none() {
            errors.push(ApiFieldError::missing("message"));
        }

        match (name, email, message) {
            (Some(name), Some(email), Some(message)) if errors.is_empty() => Ok(Self {
                name,
                email,
                message,
            }),
            _ => Err(errors),
        }
    }
}
