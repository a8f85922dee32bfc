use std::sync::Arc;

use tokio::sync::mpsc::error::SendTimeoutError;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::domain::{ForwardPolicy, LoopExit, Peer, Rendezvous};
use crate::ports::{ForwardFilter, PeerHost};

use super::metrics::DiscoveryMetrics;
use super::ping::ping_peer;

/// The discovery event loop, moved into its own task by `run`.
pub(crate) struct DiscoveryLoop<H: PeerHost> {
    pub(crate) peer_rx: mpsc::Receiver<Peer>,
    pub(crate) stop_rx: oneshot::Receiver<()>,
    pub(crate) processor: PeerProcessor<H>,
}

/// Per-peer side effects: register, ping, forward.
pub(crate) struct PeerProcessor<H: PeerHost> {
    pub(crate) host: Arc<H>,
    pub(crate) rendezvous: Rendezvous,
    pub(crate) staking_tx: mpsc::Sender<Peer>,
    pub(crate) forward_policy: ForwardPolicy,
    pub(crate) filter: Arc<dyn ForwardFilter>,
    pub(crate) metrics: Arc<DiscoveryMetrics>,
}

impl<H: PeerHost> DiscoveryLoop<H> {
    /// Multiplex peer arrivals and the stop signal until one of them ends
    /// the loop.
    ///
    /// Neither source has priority when both are ready. A peer that has been
    /// dequeued is always processed to completion before the next select.
    pub(crate) async fn run(self) -> LoopExit {
        let DiscoveryLoop {
            mut peer_rx,
            mut stop_rx,
            processor,
        } = self;

        info!(
            rendezvous = %processor.rendezvous,
            "[qc-01] Discovery loop started"
        );

        let exit = loop {
            tokio::select! {
                maybe_peer = peer_rx.recv() => match maybe_peer {
                    Some(peer) => processor.process(peer).await,
                    None => {
                        debug!("[qc-01] Peer channel closed, end of discovery input");
                        break LoopExit::InboundClosed;
                    }
                },
                signal = &mut stop_rx => {
                    break match signal {
                        Ok(()) => LoopExit::Stopped,
                        Err(_) => {
                            warn!("[qc-01] Discovery service dropped without stop, ending loop");
                            LoopExit::ControllerDropped
                        }
                    };
                }
            }
        };

        info!(?exit, "[qc-01] Discovery loop exited");
        exit
    }
}

impl<H: PeerHost> PeerProcessor<H> {
    pub(crate) async fn process(&self, peer: Peer) {
        self.metrics.record_received();
        debug!(peer = %peer, rendezvous = %self.rendezvous, "[qc-01] Discovered peer");

        match self.host.add_peer(&peer) {
            Ok(()) => self.metrics.record_registered(true),
            Err(e) => {
                warn!(peer = %peer, error = %e, "[qc-01] Host failed to register peer");
                self.metrics.record_registered(false);
            }
        }

        // TODO: skip the ping when this peer was pinged recently
        match ping_peer(self.host.as_ref(), &peer) {
            Ok(()) => self.metrics.record_ping(true),
            Err(e) => {
                warn!(peer = %peer, error = %e, "[qc-01] Ping failed");
                self.metrics.record_ping(false);
            }
        }

        self.forward(peer).await;
    }

    async fn forward(&self, peer: Peer) {
        if !self.filter.should_forward(&peer) {
            debug!(peer = %peer, "[qc-01] Forward filter held peer back");
            self.metrics.record_skipped();
            return;
        }

        let (peer_id, addr) = (peer.peer_id, peer.addr);
        let outcome = match self.forward_policy {
            ForwardPolicy::Block => self
                .staking_tx
                .send(peer)
                .await
                .map_err(|_| "forward channel closed"),
            ForwardPolicy::DropAfter(limit) => self
                .staking_tx
                .send_timeout(peer, limit)
                .await
                .map_err(|e| match e {
                    SendTimeoutError::Timeout(_) => "staking consumer too slow",
                    SendTimeoutError::Closed(_) => "forward channel closed",
                }),
        };

        match outcome {
            Ok(()) => self.metrics.record_forwarded(),
            Err(reason) => {
                warn!(
                    peer = %peer_id.short(),
                    %addr,
                    reason,
                    "[qc-01] Dropped staking forward"
                );
                self.metrics.record_dropped();
            }
        }
    }
}
