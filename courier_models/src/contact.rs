use nutype::nutype;

use crate::email_address::EmailAddress;

/// A single contact form submission. It only lives for the duration of the
/// request that carried it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: ContactName,
    pub email: EmailAddress,
    pub message: ContactMessageContent,
}

#[nutype(
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactName(String);

/// Free text, possibly empty or spanning several lines.
#[nutype(derive(Debug, Clone, PartialEq, Eq, From, Deref, Serialize, Deserialize))]
pub struct ContactMessageContent(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_must_not_be_empty() {
        assert!(ContactName::try_new("").is_err());
        assert_eq!(*ContactName::try_new("Ana").unwrap(), "Ana");
    }

    #[test]
    fn name_is_not_trimmed() {
        assert_eq!(*ContactName::try_new(" Ana ").unwrap(), " Ana ");
    }

    #[test]
    fn message_may_be_empty() {
        assert_eq!(*ContactMessageContent::new(""), "");
        assert_eq!(*ContactMessageContent::new("Hello\nWorld"), "Hello\nWorld");
    }
}
