//! Assembles the concrete services from the loaded configuration.

use portfolio_config::Config;
use portfolio_core_contact_impl::{ContactServiceConfig, ContactServiceImpl};
use portfolio_extern_impl::relay::{RelayApiServiceConfig, RelayApiServiceImpl};
use portfolio_persistence_csv::CsvMessageLog;
use portfolio_shared_impl::time::TimeServiceImpl;

pub type Time = TimeServiceImpl;
pub type Log = CsvMessageLog;
pub type Relay = RelayApiServiceImpl;
pub type Contact = ContactServiceImpl<Time, Log, Relay>;
pub type RestServer = portfolio_api_rest::RestServer<Contact>;

pub fn rest_server(config: &Config) -> RestServer {
    RestServer::new(contact_service(config))
}

pub fn contact_service(config: &Config) -> Contact {
    let contact_service_config = ContactServiceConfig {
        relay_destination: relay_destination(config).map(Into::into),
    };

    ContactServiceImpl::new(
        TimeServiceImpl,
        message_log(config),
        relay_api_service(config),
        contact_service_config,
    )
}

pub fn message_log(config: &Config) -> Log {
    CsvMessageLog::new(&config.contact.log_path)
}

pub fn relay_api_service(config: &Config) -> Relay {
    RelayApiServiceImpl::new(RelayApiServiceConfig::new(
        config.relay.endpoint_override.clone(),
        config.relay.timeout.into(),
    ))
}

/// The configured relay destination, treating a blank value as unset.
pub fn relay_destination(config: &Config) -> Option<&str> {
    config
        .relay
        .destination
        .as_deref()
        .map(str::trim)
        .filter(|destination| !destination.is_empty())
}
