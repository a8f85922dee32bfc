use crate::domain::{HostError, Peer};
use crate::ports::PeerHost;

// ============================================================================
// NoOpPeerHost - Stub for wiring without network
// ============================================================================

/// Host that accepts every peer and drops every message.
///
/// Use this to run the discovery service without a transport.
#[derive(Debug, Clone)]
pub struct NoOpPeerHost {
    self_peer: Peer,
}

impl NoOpPeerHost {
    #[must_use]
    pub fn new(self_peer: Peer) -> Self {
        Self { self_peer }
    }
}

impl PeerHost for NoOpPeerHost {
    fn add_peer(&self, _peer: &Peer) -> Result<(), HostError> {
        Ok(())
    }

    fn send_message(&self, _peer: &Peer, _message: Vec<u8>) -> Result<(), HostError> {
        Ok(())
    }

    fn get_self_peer(&self) -> Peer {
        self.self_peer.clone()
    }
}

// ============================================================================
// UdpPeerHost - UDP transport (requires "network" feature)
// ============================================================================

#[cfg(feature = "network")]
mod udp_host {
    use super::*;
    use crate::domain::PeerId;
    use parking_lot::RwLock;
    use std::collections::HashMap;
    use std::io::ErrorKind;
    use std::net::{SocketAddr, UdpSocket};

    /// Largest payload a single UDP datagram can carry over IPv4.
    pub const MAX_DATAGRAM_SIZE: usize = 65_507;

    /// UDP-backed P2P host.
    ///
    /// Keeps a peer table keyed by `PeerId` and sends each framed message as
    /// one datagram to the peer's address. The socket is non-blocking so a
    /// send never parks the discovery loop.
    pub struct UdpPeerHost {
        socket: UdpSocket,
        self_peer: RwLock<Peer>,
        peers: RwLock<HashMap<PeerId, Peer>>,
    }

    impl UdpPeerHost {
        /// Bind to a local address.
        ///
        /// The advertised self address defaults to the bound address (with
        /// the OS-assigned port when binding to port 0).
        ///
        /// # Errors
        ///
        /// Returns error if socket binding fails.
        pub fn bind(
            bind_addr: SocketAddr,
            peer_id: PeerId,
            public_key: Vec<u8>,
        ) -> std::io::Result<Self> {
            let socket = UdpSocket::bind(bind_addr)?;
            socket.set_nonblocking(true)?;
            let local = socket.local_addr()?;
            Ok(Self {
                socket,
                self_peer: RwLock::new(Peer::new(peer_id, local).with_public_key(public_key)),
                peers: RwLock::new(HashMap::new()),
            })
        }

        /// Get the local address the socket is bound to.
        pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
            self.socket.local_addr()
        }

        /// Advertise a different address in pings (e.g. a public IP when
        /// bound to `0.0.0.0`).
        pub fn advertise(&self, addr: SocketAddr) {
            self.self_peer.write().addr = addr;
        }

        /// Replace the local identity.
        pub fn set_self_peer(&self, peer: Peer) {
            *self.self_peer.write() = peer;
        }

        pub fn peer_count(&self) -> usize {
            self.peers.read().len()
        }

        pub fn contains(&self, peer_id: &PeerId) -> bool {
            self.peers.read().contains_key(peer_id)
        }

        pub fn peers(&self) -> Vec<Peer> {
            self.peers.read().values().cloned().collect()
        }

        /// Read one pending datagram into `buf`.
        ///
        /// Returns `Ok(None)` when nothing is queued on the socket.
        pub fn try_recv(&self, buf: &mut [u8]) -> std::io::Result<Option<(usize, SocketAddr)>> {
            match self.socket.recv_from(buf) {
                Ok(received) => Ok(Some(received)),
                Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(None),
                Err(e) => Err(e),
            }
        }
    }

    impl PeerHost for UdpPeerHost {
        fn add_peer(&self, peer: &Peer) -> Result<(), HostError> {
            // Re-adding replaces the address we hold for the peer.
            self.peers.write().insert(peer.peer_id, peer.clone());
            Ok(())
        }

        fn send_message(&self, peer: &Peer, message: Vec<u8>) -> Result<(), HostError> {
            if message.len() > MAX_DATAGRAM_SIZE {
                return Err(HostError::Transport(format!(
                    "message of {} bytes exceeds datagram limit",
                    message.len()
                )));
            }
            match self.socket.send_to(&message, peer.addr) {
                Ok(_n) => Ok(()),
                Err(e) => match e.kind() {
                    ErrorKind::WouldBlock => {
                        Err(HostError::Transport("socket send buffer full".into()))
                    }
                    ErrorKind::ConnectionRefused => {
                        Err(HostError::Transport(format!("connection refused by {}", peer.addr)))
                    }
                    ErrorKind::InvalidInput | ErrorKind::AddrNotAvailable => {
                        Err(HostError::UnknownPeer(format!("unreachable address {}", peer.addr)))
                    }
                    _ => Err(HostError::from(e)),
                },
            }
        }

        fn get_self_peer(&self) -> Peer {
            self.self_peer.read().clone()
        }
    }
}

#[cfg(feature = "network")]
pub use udp_host::{UdpPeerHost, MAX_DATAGRAM_SIZE};
