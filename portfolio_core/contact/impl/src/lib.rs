use std::sync::Arc;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use portfolio_core_contact_contracts::{ContactService, ContactSubmitError, ContactSubmitOutcome};
use portfolio_extern_contracts::relay::RelayApiService;
use portfolio_models::contact::{ContactForm, ContactSubmission};
use portfolio_persistence_contracts::MessageLog;
use portfolio_shared_contracts::time::TimeService;
use tracing::{debug, error, info, warn};

/// Characters left as-is in `mailto:` query values (RFC 3986 unreserved).
const MAILTO_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Debug, Clone)]
pub struct ContactServiceImpl<Time, Log, Relay> {
    time: Time,
    log: Log,
    relay: Relay,
    config: ContactServiceConfig,
}

#[derive(Debug, Clone, Default)]
pub struct ContactServiceConfig {
    /// Identifier the relay forwards submissions to. `None` disables the relay.
    pub relay_destination: Option<Arc<str>>,
}

impl<Time, Log, Relay> ContactServiceImpl<Time, Log, Relay> {
    pub fn new(time: Time, log: Log, relay: Relay, config: ContactServiceConfig) -> Self {
        Self {
            time,
            log,
            relay,
            config,
        }
    }
}

impl<Time, Log, Relay> ContactService for ContactServiceImpl<Time, Log, Relay>
where
    Time: TimeService,
    Log: MessageLog,
    Relay: RelayApiService,
{
    #[tracing::instrument(skip_all)]
    async fn submit(&self, form: ContactForm) -> Result<ContactSubmitOutcome, ContactSubmitError> {
        let submission = ContactSubmission::new(self.time.now(), form).map_err(|empty_fields| {
            debug!(?empty_fields, "rejecting contact submission");
            ContactSubmitError::Validation(empty_fields)
        })?;

        self.log.append(&submission).await.map_err(|err| {
            error!("Failed to save contact submission: {err:#}");
            ContactSubmitError::Persistence(err)
        })?;
        info!(timestamp = %submission.timestamp, "saved contact submission");

        let Some(destination) = self.config.relay_destination.as_deref() else {
            return Ok(ContactSubmitOutcome::SavedLocallyOnly);
        };

        match self.relay.forward(destination, &submission).await {
            Ok(()) => {
                info!(destination, "delivered contact submission");
                Ok(ContactSubmitOutcome::Delivered)
            }
            Err(err) => {
                warn!(destination, "Failed to deliver contact submission: {err:#}");
                Ok(ContactSubmitOutcome::SavedWithFallback {
                    fallback_link: fallback_link(destination, &submission),
                })
            }
        }
    }
}

/// Builds a `mailto:` link to `recipient` pre-filled with the submission.
pub fn fallback_link(recipient: &str, submission: &ContactSubmission) -> String {
    let subject = format!("Website Message from {}", submission.name.as_str());
    format!(
        "mailto:{recipient}?subject={}&body={}",
        utf8_percent_encode(&subject, MAILTO_VALUE),
        utf8_percent_encode(submission.message.as_str(), MAILTO_VALUE),
    )
}

#[cfg(test)]
mod tests {
    use portfolio_demo::{form, JANE, MAX, RELAY_DESTINATION};
    use portfolio_extern_contracts::relay::MockRelayApiService;
    use portfolio_models::contact::ContactField;
    use portfolio_persistence_contracts::MockMessageLog;
    use portfolio_shared_contracts::time::MockTimeService;
    use portfolio_utils::assert_matches;

    use super::*;

    type Sut = ContactServiceImpl<MockTimeService, MockMessageLog, MockRelayApiService>;

    fn relay_config() -> ContactServiceConfig {
        ContactServiceConfig {
            relay_destination: Some(RELAY_DESTINATION.into()),
        }
    }

    #[tokio::test]
    async fn saved_locally_only() {
        // Arrange
        let time = MockTimeService::new().with_now(JANE.timestamp);
        let log = MockMessageLog::new().with_append(JANE.clone(), true);
        let relay = MockRelayApiService::new();

        let sut: Sut = ContactServiceImpl::new(time, log, relay, Default::default());

        // Act
        let result = sut.submit(form(&JANE)).await;

        // Assert
        assert_eq!(result.unwrap(), ContactSubmitOutcome::SavedLocallyOnly);
    }

    #[tokio::test]
    async fn delivered() {
        // Arrange
        let time = MockTimeService::new().with_now(JANE.timestamp);
        let log = MockMessageLog::new().with_append(JANE.clone(), true);
        let relay =
            MockRelayApiService::new().with_forward(RELAY_DESTINATION.into(), JANE.clone(), true);

        let sut: Sut = ContactServiceImpl::new(time, log, relay, relay_config());

        // Act
        let result = sut.submit(form(&JANE)).await;

        // Assert
        assert_eq!(result.unwrap(), ContactSubmitOutcome::Delivered);
    }

    #[tokio::test]
    async fn relay_failure_falls_back_to_mailto() {
        // Arrange
        let time = MockTimeService::new().with_now(JANE.timestamp);
        let log = MockMessageLog::new().with_append(JANE.clone(), true);
        let relay =
            MockRelayApiService::new().with_forward(RELAY_DESTINATION.into(), JANE.clone(), false);

        let sut: Sut = ContactServiceImpl::new(time, log, relay, relay_config());

        // Act
        let result = sut.submit(form(&JANE)).await;

        // Assert
        assert_eq!(
            result.unwrap(),
            ContactSubmitOutcome::SavedWithFallback {
                fallback_link: "mailto:owner@example.com?subject=Website%20Message%20from%20Jane%20Doe&body=Hello%20there".into()
            }
        );
    }

    #[tokio::test]
    async fn empty_fields() {
        // Arrange
        let sut: Sut = ContactServiceImpl::new(
            MockTimeService::new().with_now(JANE.timestamp),
            MockMessageLog::new(),
            MockRelayApiService::new(),
            relay_config(),
        );

        let input = ContactForm {
            name: "  ".into(),
            email: "jane@example.com".into(),
            message: "".into(),
        };

        // Act
        let result = sut.submit(input).await;

        // Assert
        assert_matches!(
            result,
            Err(ContactSubmitError::Validation(fields))
                if fields == &[ContactField::Name, ContactField::Message]
        );
    }

    #[tokio::test]
    async fn persistence_error_skips_relay() {
        // Arrange
        let time = MockTimeService::new().with_now(JANE.timestamp);
        let log = MockMessageLog::new().with_append(JANE.clone(), false);
        let relay = MockRelayApiService::new();

        let sut: Sut = ContactServiceImpl::new(time, log, relay, relay_config());

        // Act
        let result = sut.submit(form(&JANE)).await;

        // Assert
        assert_matches!(result, Err(ContactSubmitError::Persistence(_)));
    }

    #[test]
    fn fallback_link_encoding() {
        let link = fallback_link(RELAY_DESTINATION, &MAX);
        assert_eq!(
            link,
            "mailto:owner@example.com\
             ?subject=Website%20Message%20from%20Max%20%22Maxi%22%20Mustermann\
             &body=Hi%2C%0AI%20liked%20your%20projects%2C%20especially%20the%20one%20about%20Snowflake.%0A%0AGr%C3%BC%C3%9Fe%2C%20Max"
        );
    }

    #[test]
    fn fallback_link_without_recipient() {
        let link = fallback_link("", &JANE);
        assert!(link.starts_with("mailto:?subject="));
    }
}
