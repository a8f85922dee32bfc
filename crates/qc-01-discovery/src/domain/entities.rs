//! Core Domain Entities for Peer Discovery

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::errors::PeerParseError;

/// 256-bit peer identifier.
///
/// Rendered as lowercase hex in logs and bootstrap lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PeerId(pub [u8; 32]);

impl PeerId {
    /// Create a PeerId from raw 32-byte array.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Derive an identifier from a socket address.
    ///
    /// Used when a bootstrap entry carries only `IP:PORT`.
    pub fn from_addr(addr: &SocketAddr) -> Self {
        let digest = Sha256::digest(addr.to_string().as_bytes());
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    /// First four bytes as hex, for compact log lines.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for PeerId {
    type Err = PeerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = hex::decode(s).map_err(|_| PeerParseError::InvalidId(s.to_string()))?;
        let bytes: [u8; 32] = raw
            .try_into()
            .map_err(|_| PeerParseError::InvalidId(s.to_string()))?;
        Ok(Self(bytes))
    }
}

/// A remote node's identity and network address.
///
/// Immutable once received. The discovery loop hands it to the host registry
/// by reference and to the forward channel by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Peer {
    /// Unique peer identifier.
    pub peer_id: PeerId,
    /// Network address for P2P communication.
    pub addr: SocketAddr,
    /// Public key bytes advertised by the peer (may be empty).
    pub public_key: Vec<u8>,
}

impl Peer {
    pub fn new(peer_id: PeerId, addr: SocketAddr) -> Self {
        Self {
            peer_id,
            addr,
            public_key: Vec::new(),
        }
    }

    /// Attach a public key.
    #[must_use]
    pub fn with_public_key(mut self, public_key: Vec<u8>) -> Self {
        self.public_key = public_key;
        self
    }
}

impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.peer_id.short(), self.addr)
    }
}

impl FromStr for Peer {
    type Err = PeerParseError;

    /// Parse a peer description of the form `IP:PORT` or `HEX_ID@IP:PORT`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('@').collect();
        match parts.as_slice() {
            [addr] => {
                let addr = parse_addr(addr)?;
                Ok(Peer::new(PeerId::from_addr(&addr), addr))
            }
            [id, addr] => {
                let peer_id: PeerId = id.parse()?;
                Ok(Peer::new(peer_id, parse_addr(addr)?))
            }
            _ => Err(PeerParseError::Malformed(s.to_string())),
        }
    }
}

fn parse_addr(s: &str) -> Result<SocketAddr, PeerParseError> {
    s.parse()
        .map_err(|_| PeerParseError::InvalidAddress(s.to_string()))
}

/// Opaque overlay grouping label (we start with the shard id).
///
/// Never interpreted by the discovery service; carried for logging and for
/// collaborators that partition the overlay.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rendezvous(String);

impl Rendezvous {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Rendezvous {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Rendezvous {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for Rendezvous {
    fn from(label: String) -> Self {
        Self(label)
    }
}
