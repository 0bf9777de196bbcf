use chrono::{DateTime, Utc};
use nutype::nutype;
use serde::{Deserialize, Serialize};

/// Raw contact form input, exactly as received from the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// A validated contact form submission together with the time it was
/// received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub timestamp: DateTime<Utc>,
    pub name: ContactName,
    pub email: ContactEmail,
    pub message: ContactMessage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Name,
    Email,
    Message,
}

// Values are stored untrimmed; whitespace only matters for the emptiness check.

#[nutype(
    validate(predicate = |s| !s.trim().is_empty()),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactName(String);

/// The sender's email address. Its shape is deliberately not checked.
#[nutype(
    validate(predicate = |s| !s.trim().is_empty()),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactEmail(String);

#[nutype(
    validate(predicate = |s| !s.trim().is_empty()),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactMessage(String);

impl ContactForm {
    /// Returns the fields that are empty after trimming, in form order.
    pub fn empty_fields(&self) -> Vec<ContactField> {
        [
            (ContactField::Name, &self.name),
            (ContactField::Email, &self.email),
            (ContactField::Message, &self.message),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }
}

impl ContactSubmission {
    /// Validates `form` and stamps it with `timestamp`.
    ///
    /// On failure, returns every field that is empty after trimming.
    pub fn new(timestamp: DateTime<Utc>, form: ContactForm) -> Result<Self, Vec<ContactField>> {
        let empty = form.empty_fields();
        if !empty.is_empty() {
            return Err(empty);
        }

        let ContactForm {
            name,
            email,
            message,
        } = form;

        let name = ContactName::try_new(name).map_err(|_| vec![ContactField::Name])?;
        let email = ContactEmail::try_new(email).map_err(|_| vec![ContactField::Email])?;
        let message = ContactMessage::try_new(message).map_err(|_| vec![ContactField::Message])?;

        Ok(Self {
            timestamp,
            name,
            email,
            message,
        })
    }
}

impl std::fmt::Display for ContactField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Message => "message",
        })
    }
}
