use std::future::Future;

use portfolio_models::contact::ContactSubmission;

/// Third-party endpoint that forwards contact submissions as notifications.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait RelayApiService: Send + Sync + 'static {
    /// Makes a single attempt to forward `submission` to `destination`.
    ///
    /// Returns an error on network failure, timeout or a non-success status.
    fn forward(
        &self,
        destination: &str,
        submission: &ContactSubmission,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}

#[cfg(feature = "mock")]
impl MockRelayApiService {
    pub fn with_forward(
        mut self,
        destination: String,
        submission: ContactSubmission,
        result: bool,
    ) -> Self {
        self.expect_forward()
            .once()
            .with(
                mockall::predicate::eq(destination),
                mockall::predicate::eq(submission),
            )
            .return_once(move |_, _| {
                Box::pin(std::future::ready(if result {
                    Ok(())
                } else {
                    Err(anyhow::anyhow!("relay unavailable"))
                }))
            });
        self
    }
}
