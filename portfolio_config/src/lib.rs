use std::{net::IpAddr, path::PathBuf};

use anyhow::Context;
use config::{File, FileFormat};
use serde::Deserialize;
use url::Url;

pub use crate::duration::Duration;

mod duration;

pub const DEFAULT_CONFIG: &str = include_str!("../../config.toml");

/// Environment variable holding a colon separated list of additional config
/// files, applied in order on top of the defaults.
pub const CONFIG_PATHS_ENV: &str = "PORTFOLIO_CONFIG";

pub fn load() -> anyhow::Result<Config> {
    let paths = std::env::var(CONFIG_PATHS_ENV).unwrap_or_default();
    let paths = paths
        .split(':')
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
        .collect::<Vec<_>>();
    load_with_override(&paths, &[])
}

/// Loads the default config, then the files at `paths`, then each TOML
/// snippet in `overrides`.
pub fn load_with_override(paths: &[PathBuf], overrides: &[&str]) -> anyhow::Result<Config> {
    let builder = config::Config::builder()
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

    let builder = paths.iter().try_fold(builder, |builder, path| {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        anyhow::Ok(builder.add_source(File::from_str(&content, FileFormat::Toml)))
    })?;

    overrides
        .iter()
        .fold(builder, |builder, snippet| {
            builder.add_source(File::from_str(snippet, FileFormat::Toml))
        })
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub contact: ContactConfig,
    pub relay: RelayConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    pub log_path: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct RelayConfig {
    pub destination: Option<String>,
    pub timeout: Duration,
    pub endpoint_override: Option<Url>,
}
