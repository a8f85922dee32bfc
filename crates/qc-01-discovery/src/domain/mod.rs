//! Domain Layer - Pure types with no I/O
//!
//! - Peer identity, address and the opaque rendezvous label
//! - Ping message and P2P framing
//! - Service configuration, loop exit reasons and counters
//! - Error taxonomy

pub mod entities;
pub mod errors;
pub mod message;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use message::*;
pub use value_objects::*;
