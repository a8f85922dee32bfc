//! Ping message and P2P framing.
//!
//! ## Wire Format
//!
//! ```text
//! [category: u8][body ...]
//! ```
//!
//! The category tag for a discovery ping is `0`. The body is the bincode
//! encoding of [`PingMessage`].

use serde::{Deserialize, Serialize};

use super::entities::Peer;
use super::errors::{FrameError, PingError};

/// Current ping protocol version.
pub const PING_PROTOCOL_VERSION: u16 = 1;

/// Message categories at the transport-framing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageCategory {
    /// Discovery liveness probe.
    Ping = 0x00,
}

impl MessageCategory {
    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for MessageCategory {
    type Error = FrameError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0x00 => Ok(MessageCategory::Ping),
            other => Err(FrameError::UnknownCategory(other)),
        }
    }
}

/// Liveness probe carrying the sender's self-identity.
///
/// Built fresh for every ping; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingMessage {
    pub version: u16,
    pub node: Peer,
}

impl PingMessage {
    pub fn new(node: Peer) -> Self {
        Self {
            version: PING_PROTOCOL_VERSION,
            node,
        }
    }

    /// Encode the ping body (without the category tag).
    pub fn encode(&self) -> Result<Vec<u8>, PingError> {
        bincode::serialize(self).map_err(|e| PingError::Encode(e.to_string()))
    }

    /// Decode a ping body produced by [`PingMessage::encode`].
    pub fn decode(body: &[u8]) -> Result<Self, FrameError> {
        bincode::deserialize(body).map_err(|e| FrameError::Decode(e.to_string()))
    }
}

/// Prefix `content` with the category tag.
pub fn construct_p2p_message(category: MessageCategory, content: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(1 + content.len());
    message.push(category.tag());
    message.extend_from_slice(content);
    message
}

/// Split a frame into its category and body.
pub fn decode_p2p_message(frame: &[u8]) -> Result<(MessageCategory, &[u8]), FrameError> {
    let (tag, body) = frame.split_first().ok_or(FrameError::Empty)?;
    Ok((MessageCategory::try_from(*tag)?, body))
}
