use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::DiscoveryStats;

/// Lock-free processing counters shared between the loop task and the
/// controller.
#[derive(Debug, Default)]
pub struct DiscoveryMetrics {
    peers_received: AtomicU64,
    peers_registered: AtomicU64,
    register_failures: AtomicU64,
    pings_sent: AtomicU64,
    ping_failures: AtomicU64,
    peers_forwarded: AtomicU64,
    forwards_skipped: AtomicU64,
    forwards_dropped: AtomicU64,
}

impl DiscoveryMetrics {
    pub fn record_received(&self) {
        self.peers_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_registered(&self, ok: bool) {
        if ok {
            self.peers_registered.fetch_add(1, Ordering::Relaxed);
        } else {
            self.register_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_ping(&self, ok: bool) {
        if ok {
            self.pings_sent.fetch_add(1, Ordering::Relaxed);
        } else {
            self.ping_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_forwarded(&self) {
        self.peers_forwarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.forwards_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped(&self) {
        self.forwards_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DiscoveryStats {
        DiscoveryStats {
            peers_received: self.peers_received.load(Ordering::Relaxed),
            peers_registered: self.peers_registered.load(Ordering::Relaxed),
            register_failures: self.register_failures.load(Ordering::Relaxed),
            pings_sent: self.pings_sent.load(Ordering::Relaxed),
            ping_failures: self.ping_failures.load(Ordering::Relaxed),
            peers_forwarded: self.peers_forwarded.load(Ordering::Relaxed),
            forwards_skipped: self.forwards_skipped.load(Ordering::Relaxed),
            forwards_dropped: self.forwards_dropped.load(Ordering::Relaxed),
        }
    }
}
