use portfolio_config::Config;
use tracing::{info, warn};

use crate::environment;

pub async fn serve(config: Config) -> anyhow::Result<()> {
    info!(
        "Storing contact submissions in {}",
        config.contact.log_path.display()
    );

    match environment::relay_destination(&config) {
        Some(destination) => info!(
            "Forwarding contact submissions to {destination} (timeout: {:?})",
            *config.relay.timeout
        ),
        None => warn!("No relay destination configured, contact submissions are only stored locally"),
    }

    let server = environment::rest_server(&config);
    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve(config.http.host, config.http.port).await
}
