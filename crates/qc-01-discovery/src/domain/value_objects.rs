//! Value Objects for Peer Discovery

use std::time::Duration;

use super::entities::Rendezvous;

/// Default capacity of the inbound peer-arrival channel.
pub const DEFAULT_INBOUND_CAPACITY: usize = 128;

/// Default capacity of the staking forward channel.
pub const DEFAULT_FORWARD_CAPACITY: usize = 16;

/// What the loop does when the forward channel is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForwardPolicy {
    /// Wait for the downstream consumer. A slow or absent consumer stalls the
    /// loop.
    #[default]
    Block,
    /// Wait at most this long for buffer space, then drop the forward.
    ///
    /// Deviation from the blocking baseline: the peer is still registered and
    /// pinged, but the staking workflow never sees it.
    DropAfter(Duration),
}

/// Configuration for the discovery service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// Overlay grouping label (shard id)
    pub rendezvous: Rendezvous,
    /// Capacity of the inbound peer channel created by the runtime
    pub inbound_capacity: usize,
    /// Capacity of the forward channel created by the runtime
    pub forward_capacity: usize,
    /// Behavior of the forward step under backpressure
    pub forward_policy: ForwardPolicy,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            rendezvous: Rendezvous::new("0"),
            inbound_capacity: DEFAULT_INBOUND_CAPACITY,
            forward_capacity: DEFAULT_FORWARD_CAPACITY,
            forward_policy: ForwardPolicy::Block,
        }
    }
}

impl DiscoveryConfig {
    /// Create a config suitable for testing (tiny buffers)
    pub fn for_testing() -> Self {
        Self {
            rendezvous: Rendezvous::new("test"),
            inbound_capacity: 8,
            forward_capacity: 1,
            forward_policy: ForwardPolicy::Block,
        }
    }
}

/// Why the discovery loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The stop signal was received
    Stopped,
    /// Every inbound sender was dropped and the channel drained
    InboundClosed,
    /// The controller was dropped without calling `stop`
    ControllerDropped,
}

/// Point-in-time copy of the discovery counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiscoveryStats {
    pub peers_received: u64,
    pub peers_registered: u64,
    pub register_failures: u64,
    pub pings_sent: u64,
    pub ping_failures: u64,
    pub peers_forwarded: u64,
    /// Peers held back by the forward filter
    pub forwards_skipped: u64,
    /// Forwards lost to timeout or a closed forward channel
    pub forwards_dropped: u64,
}
