// ============================================================================
// TomlConfigProvider - Config file loading (requires "network" feature)
// ============================================================================

use crate::domain::{DiscoveryConfig, ForwardPolicy, Peer, PeerId, Rendezvous};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default UDP bind address for the P2P host.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:9000";

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    discovery: DiscoverySection,
    #[serde(default)]
    network: NetworkSection,
    #[serde(default)]
    bootstrap: BootstrapSection,
}

#[derive(Debug, Deserialize, Default)]
struct DiscoverySection {
    rendezvous: Option<String>,
    inbound_capacity: Option<usize>,
    forward_capacity: Option<usize>,
    forward_timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct NetworkSection {
    bind: Option<String>,
    advertise: Option<String>,
    peer_id: Option<String>,
    public_key: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct BootstrapSection {
    #[serde(default)]
    peers: Vec<String>,
}

/// TOML-based configuration provider.
///
/// # Config File Format
///
/// ```toml
/// [discovery]
/// rendezvous = "shard-0"
/// inbound_capacity = 128
/// forward_capacity = 16
/// forward_timeout_ms = 500   # omit to block on a slow staking consumer
///
/// [network]
/// bind = "0.0.0.0:9000"
/// advertise = "203.0.113.7:9000"
/// peer_id = "<64 hex chars>"  # omit to derive from the bind address
/// public_key = "<hex>"
///
/// [bootstrap]
/// peers = ["<hex id>@10.0.0.1:9000", "10.0.0.2:9000"]
/// ```
#[derive(Debug, Clone)]
pub struct TomlConfigProvider {
    discovery: DiscoveryConfig,
    bind_addr: SocketAddr,
    advertise_addr: Option<SocketAddr>,
    peer_id: PeerId,
    public_key: Vec<u8>,
    bootstrap_peers: Vec<Peer>,
}

impl TomlConfigProvider {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read, parsed or validated.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let defaults = DiscoveryConfig::default();
        let dc = file.discovery;
        let discovery = DiscoveryConfig {
            rendezvous: dc
                .rendezvous
                .map(Rendezvous::new)
                .unwrap_or(defaults.rendezvous),
            inbound_capacity: non_zero(
                "inbound_capacity",
                dc.inbound_capacity.unwrap_or(defaults.inbound_capacity),
            )?,
            forward_capacity: non_zero(
                "forward_capacity",
                dc.forward_capacity.unwrap_or(defaults.forward_capacity),
            )?,
            forward_policy: match dc.forward_timeout_ms {
                Some(ms) => ForwardPolicy::DropAfter(Duration::from_millis(ms)),
                None => ForwardPolicy::Block,
            },
        };

        let net = file.network;
        let bind_addr = parse_addr(net.bind.as_deref().unwrap_or(DEFAULT_BIND_ADDR))?;
        let advertise_addr = net.advertise.as_deref().map(parse_addr).transpose()?;
        let peer_id = match net.peer_id {
            Some(hex_id) => hex_id
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("network.peer_id: {}", e)))?,
            None => PeerId::from_addr(&bind_addr),
        };
        let public_key = match net.public_key {
            Some(hex_key) => hex::decode(&hex_key)
                .map_err(|e| ConfigError::Invalid(format!("network.public_key: {}", e)))?,
            None => Vec::new(),
        };

        let bootstrap_peers = file
            .bootstrap
            .peers
            .iter()
            .map(|entry| {
                entry
                    .parse::<Peer>()
                    .map_err(|e| ConfigError::Invalid(format!("bootstrap.peers: {}", e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            discovery,
            bind_addr,
            advertise_addr,
            peer_id,
            public_key,
            bootstrap_peers,
        })
    }

    pub fn discovery_config(&self) -> &DiscoveryConfig {
        &self.discovery
    }

    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    pub fn advertise_addr(&self) -> Option<SocketAddr> {
        self.advertise_addr
    }

    pub fn peer_id(&self) -> PeerId {
        self.peer_id
    }

    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    pub fn bootstrap_peers(&self) -> &[Peer] {
        &self.bootstrap_peers
    }

    /// Override the rendezvous label (e.g. from the environment).
    #[must_use]
    pub fn with_rendezvous(mut self, label: impl Into<Rendezvous>) -> Self {
        self.discovery.rendezvous = label.into();
        self
    }

    /// Override the bind address (e.g. from the environment).
    #[must_use]
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }
}

fn non_zero(field: &str, value: usize) -> Result<usize, ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid(format!("discovery.{} must be > 0", field)));
    }
    Ok(value)
}

fn parse_addr(s: &str) -> Result<SocketAddr, ConfigError> {
    s.parse()
        .map_err(|_| ConfigError::Invalid(format!("invalid socket address: {}", s)))
}

/// Errors that can occur during config loading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("Failed to read {path}: {error}")]
    Io {
        /// Path of the file that failed to load.
        path: String,
        /// Error message from the I/O operation.
        error: String,
    },
    /// TOML parsing error.
    #[error("Failed to parse config: {0}")]
    Parse(String),
    /// Parsed but semantically invalid value.
    #[error("Invalid config: {0}")]
    Invalid(String),
}
