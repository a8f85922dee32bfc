//! # Peer Discovery Forwarding Subsystem
//!
//! **Subsystem ID:** 1
//!
//! Consumes peer-arrival events, registers each discovered peer with the
//! node's P2P host, sends it a liveness ping and forwards it to the staking
//! workflow.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture with:
//! - **Domain Layer:** Peer identity, ping message, framing, config, errors
//! - **Ports Layer:** `PeerHost` (driven), `DiscoveryLifecycle` (driving)
//! - **Service Layer:** The discovery event loop and ping emitter
//! - **Adapters Layer:** UDP host and TOML config (feature `network`)
//!
//! ## Concurrency
//!
//! One tokio task runs the loop. It selects over the inbound peer channel and
//! a one-shot stop signal with no priority between them. Each dequeued peer
//! is registered, pinged and forwarded before the loop selects again.
//!
//! ## Example
//!
//! ```rust,ignore
//! use qc_01_discovery::{DiscoveryLifecycle, DiscoveryService};
//!
//! let (peer_tx, peer_rx) = tokio::sync::mpsc::channel(128);
//! let (staking_tx, mut staking_rx) = tokio::sync::mpsc::channel(16);
//!
//! let mut service = DiscoveryService::new(host, "shard-0", peer_rx, staking_tx);
//! service.start()?;
//!
//! peer_tx.send(peer.clone()).await?;
//! assert_eq!(staking_rx.recv().await, Some(peer));
//!
//! service.stop().await?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Test utilities (RecordingHost, fixtures)
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Domain
pub use domain::{
    construct_p2p_message, decode_p2p_message, DiscoveryConfig, DiscoveryError, DiscoveryStats,
    ForwardPolicy, FrameError, HostError, LoopExit, MessageCategory, Peer, PeerId,
    PeerParseError, PingError, PingMessage, Rendezvous, PING_PROTOCOL_VERSION,
};

// Port traits
pub use ports::{DiscoveryLifecycle, ForwardAll, ForwardFilter, PeerHost};

// Service
pub use service::{ping_peer, DiscoveryService};

// Adapters
pub use adapters::NoOpPeerHost;

#[cfg(feature = "network")]
pub use adapters::{ConfigError, TomlConfigProvider, UdpPeerHost};
