mod macros;

/// Returns the version string reported by the binary and the relay client.
pub fn portfolio_version() -> &'static str {
    match option_env!("PORTFOLIO_VERSION") {
        Some(version) => version,
        None => env!("CARGO_PKG_VERSION"),
    }
}
