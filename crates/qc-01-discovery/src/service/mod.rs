//! # Peer Discovery Service
//!
//! Owns the discovery event loop and implements the `DiscoveryLifecycle`
//! port.
//!
//! ## Flow
//!
//! ```text
//! peer source ──Peer──→ [select: peer | stop] ──→ host.add_peer
//!                                │                 ping_peer (tag 0)
//!                                │                 staking_tx.send
//!                                └── stop / channel closed → exit
//! ```

// Semantic submodules
mod core;
mod event_loop;
mod metrics;
mod ping;

// Re-export public API
pub use self::core::DiscoveryService;
pub use metrics::DiscoveryMetrics;
pub use ping::ping_peer;
