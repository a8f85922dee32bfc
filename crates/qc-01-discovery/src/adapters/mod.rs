//! # Adapters Layer
//!
//! Concrete implementations of the outbound ports.
//!
//! - `host`: `NoOpPeerHost` always, `UdpPeerHost` with feature `network`
//! - `config`: TOML config loading with feature `network`

pub mod host;

#[cfg(feature = "network")]
pub mod config;

pub use host::NoOpPeerHost;

#[cfg(feature = "network")]
pub use config::{ConfigError, TomlConfigProvider, DEFAULT_BIND_ADDR};
#[cfg(feature = "network")]
pub use host::{UdpPeerHost, MAX_DATAGRAM_SIZE};
