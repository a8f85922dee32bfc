//! # Driven Ports (Outbound SPI)
//!
//! These are the interfaces this subsystem **requires** the host application to implement.

use crate::domain::{HostError, Peer};

/// Narrow capability interface onto the node's P2P host.
///
/// The discovery service never touches connection pools, address books or
/// the transport directly; everything goes through these three calls.
///
/// # Thread Safety
///
/// The host is shared with other subsystems via `Arc`, so implementations
/// must synchronize internally and be `Send + Sync`.
///
/// # Example Implementation
///
/// ```rust,ignore
/// struct LoggingHost { me: Peer }
///
/// impl PeerHost for LoggingHost {
///     fn add_peer(&self, peer: &Peer) -> Result<(), HostError> {
///         tracing::info!(%peer, "registered");
///         Ok(())
///     }
///     fn send_message(&self, peer: &Peer, message: Vec<u8>) -> Result<(), HostError> {
///         tracing::info!(%peer, len = message.len(), "send");
///         Ok(())
///     }
///     fn get_self_peer(&self) -> Peer {
///         self.me.clone()
///     }
/// }
/// ```
pub trait PeerHost: Send + Sync + 'static {
    /// Register a peer with the host's peer table.
    ///
    /// Duplicate registration is the host's concern.
    fn add_peer(&self, peer: &Peer) -> Result<(), HostError>;

    /// Best-effort send of a framed message to a peer.
    fn send_message(&self, peer: &Peer, message: Vec<u8>) -> Result<(), HostError>;

    /// Current local identity. Called fresh for every ping.
    fn get_self_peer(&self) -> Peer;
}

/// Decides whether a processed peer is handed to the staking workflow.
///
/// This is the hook for "only forward new nodes"; no such filter is shipped.
pub trait ForwardFilter: Send + Sync + 'static {
    fn should_forward(&self, peer: &Peer) -> bool;
}

/// Forwards every peer unconditionally.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardAll;

impl ForwardFilter for ForwardAll {
    fn should_forward(&self, _peer: &Peer) -> bool {
        true
    }
}

impl<F> ForwardFilter for F
where
    F: Fn(&Peer) -> bool + Send + Sync + 'static,
{
    fn should_forward(&self, peer: &Peer) -> bool {
        self(peer)
    }
}
