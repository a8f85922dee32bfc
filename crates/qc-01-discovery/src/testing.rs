//! Centralized Testing Utilities
//!
//! Host doubles and fixtures used across the crate and by the workspace test
//! suite. Available with the `test-utils` feature flag.
//!
//! # Example
//!
//! ```rust,ignore
//! use qc_01_discovery::testing::{make_peer, RecordingHost};
//! use qc_01_discovery::PeerHost;
//!
//! let host = RecordingHost::new(make_peer(0));
//! host.add_peer(&make_peer(1)).unwrap();
//! assert_eq!(host.added_peers(), vec![make_peer(1).peer_id]);
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};

use crate::domain::{HostError, Peer, PeerId};
use crate::ports::PeerHost;

/// Creates a Peer whose id has first byte `val` and address 10.0.0.`val`:9000.
pub fn make_peer(val: u8) -> Peer {
    let mut bytes = [0u8; 32];
    bytes[0] = val;
    Peer::new(
        PeerId::new(bytes),
        SocketAddr::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, val)), 9000),
    )
}

/// One capability call observed by [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    AddPeer(PeerId),
    SendMessage(PeerId, Vec<u8>),
    GetSelfPeer,
}

/// `PeerHost` that records every call in order.
///
/// Failures can be switched on to check that the discovery loop swallows
/// them. Calls are recorded even when they fail.
#[derive(Debug)]
pub struct RecordingHost {
    self_peer: RwLock<Peer>,
    calls: Mutex<Vec<HostCall>>,
    fail_add: AtomicBool,
    fail_send: AtomicBool,
}

impl RecordingHost {
    pub fn new(self_peer: Peer) -> Self {
        Self {
            self_peer: RwLock::new(self_peer),
            calls: Mutex::new(Vec::new()),
            fail_add: AtomicBool::new(false),
            fail_send: AtomicBool::new(false),
        }
    }

    /// Replace the local identity returned by `get_self_peer`.
    pub fn set_self_peer(&self, peer: Peer) {
        *self.self_peer.write() = peer;
    }

    pub fn fail_add(&self, fail: bool) {
        self.fail_add.store(fail, Ordering::SeqCst);
    }

    pub fn fail_send(&self, fail: bool) {
        self.fail_send.store(fail, Ordering::SeqCst);
    }

    /// Every recorded call, in order.
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().clone()
    }

    pub fn added_peers(&self) -> Vec<PeerId> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                HostCall::AddPeer(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// `(target, frame)` for every `send_message` call.
    pub fn sent_messages(&self) -> Vec<(PeerId, Vec<u8>)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                HostCall::SendMessage(id, frame) => Some((*id, frame.clone())),
                _ => None,
            })
            .collect()
    }
}

impl PeerHost for RecordingHost {
    fn add_peer(&self, peer: &Peer) -> Result<(), HostError> {
        self.calls.lock().push(HostCall::AddPeer(peer.peer_id));
        if self.fail_add.load(Ordering::SeqCst) {
            return Err(HostError::Rejected(peer.peer_id.short()));
        }
        Ok(())
    }

    fn send_message(&self, peer: &Peer, message: Vec<u8>) -> Result<(), HostError> {
        self.calls
            .lock()
            .push(HostCall::SendMessage(peer.peer_id, message));
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(HostError::Transport("simulated send failure".into()));
        }
        Ok(())
    }

    fn get_self_peer(&self) -> Peer {
        self.calls.lock().push(HostCall::GetSelfPeer);
        self.self_peer.read().clone()
    }
}
