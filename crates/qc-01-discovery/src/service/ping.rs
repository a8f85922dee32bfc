use tracing::debug;

use crate::domain::{construct_p2p_message, MessageCategory, Peer, PingError, PingMessage};
use crate::ports::PeerHost;

/// Send a discovery ping to `peer`.
///
/// The sender identity is read from the host on every call, so a changed
/// self-identity shows up in the very next ping.
pub fn ping_peer<H: PeerHost + ?Sized>(host: &H, peer: &Peer) -> Result<(), PingError> {
    let ping = PingMessage::new(host.get_self_peer());
    let body = ping.encode()?;
    let content = construct_p2p_message(MessageCategory::Ping, &body);

    debug!(peer = %peer, bytes = content.len(), "[qc-01] Sending ping");
    host.send_message(peer, content)?;
    debug!(peer = %peer, "[qc-01] Sent ping");
    Ok(())
}
