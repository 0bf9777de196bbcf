use portfolio_core_contact_contracts::ContactSubmitOutcome;
use portfolio_models::contact::{ContactField, ContactForm};
use serde::{Deserialize, Serialize};

/// Missing fields are treated as empty so that they are reported by the
/// regular validation.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

impl From<ApiContactForm> for ContactForm {
    fn from(value: ApiContactForm) -> Self {
        Self {
            name: value.name,
            email: value.email,
            message: value.message,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiContactSubmitResponse {
    pub status: ApiContactSubmitStatus,
    pub detail: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_link: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiContactSubmitStatus {
    Delivered,
    SavedWithFallback,
    Saved,
}

impl From<ContactSubmitOutcome> for ApiContactSubmitResponse {
    fn from(value: ContactSubmitOutcome) -> Self {
        match value {
            ContactSubmitOutcome::Delivered => Self {
                status: ApiContactSubmitStatus::Delivered,
                detail: "Thanks! Your message was delivered.",
                fallback_link: None,
            },
            ContactSubmitOutcome::SavedWithFallback { fallback_link } => Self {
                status: ApiContactSubmitStatus::SavedWithFallback,
                detail: "Saved! Use the mail link if needed.",
                fallback_link: Some(fallback_link),
            },
            ContactSubmitOutcome::SavedLocallyOnly => Self {
                status: ApiContactSubmitStatus::Saved,
                detail: "Thanks! Your message was saved.",
                fallback_link: None,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiValidationError {
    pub detail: &'static str,
    pub fields: Vec<ContactField>,
}
