use std::future::Future;

use portfolio_models::contact::ContactSubmission;

/// Durable, append-only storage for contact submissions.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait MessageLog: Send + Sync + 'static {
    /// Appends a single submission to the log.
    ///
    /// The record is written completely or not at all. Once this returns
    /// `Ok`, the record has been handed to the operating system and will be
    /// returned by subsequent calls to [`MessageLog::list`].
    fn append(
        &self,
        submission: &ContactSubmission,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Returns all stored submissions in the order they were appended.
    fn list(&self) -> impl Future<Output = anyhow::Result<Vec<ContactSubmission>>> + Send;
}

#[cfg(feature = "mock")]
impl MockMessageLog {
    pub fn with_append(mut self, submission: ContactSubmission, result: bool) -> Self {
        self.expect_append()
            .once()
            .with(mockall::predicate::eq(submission))
            .return_once(move |_| {
                Box::pin(std::future::ready(if result {
                    Ok(())
                } else {
                    Err(anyhow::anyhow!("disk full"))
                }))
            });
        self
    }

    pub fn with_list(mut self, result: Vec<ContactSubmission>) -> Self {
        self.expect_list()
            .once()
            .return_once(move || Box::pin(std::future::ready(Ok(result))));
        self
    }
}
