//! # Ports Layer - Hexagonal Architecture Boundaries
//!
//! - **Driving Ports (Inbound):** lifecycle API exposed to the node runtime
//! - **Driven Ports (Outbound):** host capabilities and the forward filter hook

pub mod inbound;
pub mod outbound;

pub use inbound::DiscoveryLifecycle;
pub use outbound::{ForwardAll, ForwardFilter, PeerHost};
