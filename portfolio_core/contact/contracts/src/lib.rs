use std::future::Future;

use portfolio_models::contact::{ContactField, ContactForm};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactService: Send + Sync + 'static {
    /// Validates and stores a contact form submission, then tries to forward
    /// it to the configured relay.
    ///
    /// The submission is always persisted locally before the relay is
    /// contacted. Relay failures never produce an error; they are reported as
    /// [`ContactSubmitOutcome::SavedWithFallback`] instead.
    fn submit(
        &self,
        form: ContactForm,
    ) -> impl Future<Output = Result<ContactSubmitOutcome, ContactSubmitError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactSubmitOutcome {
    /// Saved locally and accepted by the relay.
    Delivered,
    /// Saved locally, but the relay could not confirm delivery. The link is a
    /// pre-filled `mailto:` URI the sender can use instead.
    SavedWithFallback { fallback_link: String },
    /// Saved locally; no relay is configured.
    SavedLocallyOnly,
}

#[derive(Debug, Error)]
pub enum ContactSubmitError {
    #[error("The following fields are empty: {0:?}")]
    Validation(Vec<ContactField>),
    #[error("Failed to save message.")]
    Persistence(#[source] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockContactService {
    pub fn with_submit(
        mut self,
        form: ContactForm,
        result: Result<ContactSubmitOutcome, ContactSubmitError>,
    ) -> Self {
        self.expect_submit()
            .once()
            .with(mockall::predicate::eq(form))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
