//! # Node Configuration
//!
//! The node reads an optional TOML file named by `QC_CONFIG` and then applies
//! environment overrides. With no file the built-in defaults are used.

use std::net::SocketAddr;

use qc_01_discovery::{ConfigError, TomlConfigProvider};
use tracing::info;

/// Path of the TOML config file.
pub const CONFIG_ENV: &str = "QC_CONFIG";
/// Overrides `discovery.rendezvous`.
pub const RENDEZVOUS_ENV: &str = "QC_DISCOVERY_RENDEZVOUS";
/// Overrides `network.bind`.
pub const P2P_BIND_ENV: &str = "QC_P2P_BIND";

/// Load configuration from the process environment.
pub fn load_config() -> Result<TomlConfigProvider, ConfigError> {
    load_config_with(|key| std::env::var(key).ok())
}

/// Load configuration reading variables through `env`.
pub fn load_config_with<F>(env: F) -> Result<TomlConfigProvider, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match env(CONFIG_ENV) {
        Some(path) => {
            info!(path = %path, "Loading config file");
            TomlConfigProvider::load(&path)?
        }
        None => TomlConfigProvider::parse("")?,
    };

    if let Some(label) = env(RENDEZVOUS_ENV) {
        config = config.with_rendezvous(label);
    }

    if let Some(bind) = env(P2P_BIND_ENV) {
        let addr: SocketAddr = bind
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("{}: invalid socket address", P2P_BIND_ENV)))?;
        config = config.with_bind_addr(addr);
    }

    Ok(config)
}
