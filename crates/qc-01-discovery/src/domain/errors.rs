//! Domain Errors for Peer Discovery
//!
//! None of these stop the discovery loop. Host and ping failures are logged
//! and counted; only lifecycle misuse surfaces to the controller.

use thiserror::Error;

/// Errors reported by a `PeerHost` implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// Transport-level send failure
    #[error("transport error: {0}")]
    Transport(String),

    /// The peer is not known to the host
    #[error("unknown peer: {0}")]
    UnknownPeer(String),

    /// The host refused to register the peer
    #[error("peer rejected by host: {0}")]
    Rejected(String),

    /// Local I/O failure (socket closed, bind lost)
    #[error("host I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for HostError {
    fn from(error: std::io::Error) -> Self {
        HostError::Io(error.to_string())
    }
}

/// Errors from building or sending a ping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PingError {
    #[error("failed to encode ping body: {0}")]
    Encode(String),

    #[error(transparent)]
    Host(#[from] HostError),
}

/// Errors from splitting a framed P2P message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("empty frame")]
    Empty,

    #[error("unknown message category tag: {0}")]
    UnknownCategory(u8),

    #[error("failed to decode message body: {0}")]
    Decode(String),
}

/// Lifecycle errors surfaced by `start` / `stop`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    /// `start` was called on a service whose loop was already spawned
    #[error("discovery service already started")]
    AlreadyStarted,

    /// `stop` was called before `start`, or twice
    #[error("discovery service is not running")]
    NotRunning,

    /// The loop task panicked or was aborted
    #[error("discovery loop terminated abnormally: {0}")]
    LoopPanicked(String),
}

/// Errors from parsing a peer description (`ID@IP:PORT` or `IP:PORT`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeerParseError {
    #[error("malformed peer description: {0}")]
    Malformed(String),

    #[error("invalid peer id: {0}")]
    InvalidId(String),

    #[error("invalid socket address: {0}")]
    InvalidAddress(String),
}
