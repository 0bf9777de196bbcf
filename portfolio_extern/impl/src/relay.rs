use std::{sync::Arc, time::Duration};

use anyhow::anyhow;
use portfolio_extern_contracts::relay::RelayApiService;
use portfolio_models::contact::ContactSubmission;
use reqwest::header::ACCEPT;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::http::HttpClient;

const FORWARD_ENDPOINT: &str = "https://formsubmit.co/ajax";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

#[derive(Debug, Clone)]
pub struct RelayApiServiceImpl {
    config: RelayApiServiceConfig,
    client: HttpClient,
}

#[derive(Debug, Clone)]
pub struct RelayApiServiceConfig {
    forward_endpoint: Arc<Url>,
    timeout: Duration,
}

impl RelayApiServiceConfig {
    pub fn new(forward_endpoint_override: Option<Url>, timeout: Duration) -> Self {
        Self {
            forward_endpoint: forward_endpoint_override
                .unwrap_or_else(|| FORWARD_ENDPOINT.parse().unwrap())
                .into(),
            timeout,
        }
    }
}

impl Default for RelayApiServiceConfig {
    fn default() -> Self {
        Self::new(None, DEFAULT_TIMEOUT)
    }
}

impl RelayApiServiceImpl {
    pub fn new(config: RelayApiServiceConfig) -> Self {
        Self {
            config,
            client: Default::default(),
        }
    }

    /// `{endpoint}/{destination}`, with `destination` as a single escaped path
    /// segment.
    fn forward_url(&self, destination: &str) -> anyhow::Result<Url> {
        let mut url = (*self.config.forward_endpoint).clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("Invalid relay endpoint: {}", self.config.forward_endpoint))?
            .pop_if_empty()
            .push(destination);
        Ok(url)
    }
}

impl RelayApiService for RelayApiServiceImpl {
    #[tracing::instrument(skip(self, submission))]
    async fn forward(
        &self,
        destination: &str,
        submission: &ContactSubmission,
    ) -> anyhow::Result<()> {
        let url = self.forward_url(destination)?;
        debug!(%url, timeout = ?self.config.timeout, "forwarding contact submission");

        self.client
            .post(url)
            .timeout(self.config.timeout)
            .header(ACCEPT, "application/json")
            .form(&ForwardRequest {
                name: submission.name.as_str(),
                email: submission.email.as_str(),
                message: submission.message.as_str(),
            })
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

#[derive(Serialize)]
struct ForwardRequest<'a> {
    name: &'a str,
    email: &'a str,
    message: &'a str,
}
