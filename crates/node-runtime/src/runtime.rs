//! # Node Runtime
//!
//! Owns the UDP host, the discovery service and the staking consumer.
//!
//! ## Startup Sequence
//!
//! 1. Bind the UDP host with the configured identity
//! 2. Create the inbound and forward channels
//! 3. Spawn the staking consumer
//! 4. Start the discovery loop
//! 5. Push bootstrap peers onto the inbound channel

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use qc_01_discovery::{
    DiscoveryLifecycle, DiscoveryService, DiscoveryStats, LoopExit, Peer, PeerHost,
    TomlConfigProvider, UdpPeerHost,
};

/// Summary returned by [`NodeRuntime::shutdown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownReport {
    pub exit: LoopExit,
    pub stats: DiscoveryStats,
    /// Peers the staking consumer received before the forward channel closed.
    pub staked: u64,
}

/// The node runtime hosting the discovery subsystem.
pub struct NodeRuntime {
    service: DiscoveryService<UdpPeerHost>,
    host: Arc<UdpPeerHost>,
    peer_tx: mpsc::Sender<Peer>,
    staking_rx: Option<mpsc::Receiver<Peer>>,
    staking_task: Option<JoinHandle<u64>>,
    bootstrap: Vec<Peer>,
}

impl NodeRuntime {
    /// Bind the host and build the service. Nothing runs until [`start`](Self::start).
    pub fn new(config: &TomlConfigProvider) -> Result<Self> {
        let host = UdpPeerHost::bind(
            config.bind_addr(),
            config.peer_id(),
            config.public_key().to_vec(),
        )
        .with_context(|| format!("Failed to bind P2P socket on {}", config.bind_addr()))?;
        if let Some(addr) = config.advertise_addr() {
            host.advertise(addr);
        }
        let host = Arc::new(host);

        let discovery = config.discovery_config();
        let (peer_tx, peer_rx) = mpsc::channel(discovery.inbound_capacity);
        let (staking_tx, staking_rx) = mpsc::channel(discovery.forward_capacity);

        let service =
            DiscoveryService::from_config(Arc::clone(&host), discovery, peer_rx, staking_tx);

        Ok(Self {
            service,
            host,
            peer_tx,
            staking_rx: Some(staking_rx),
            staking_task: None,
            bootstrap: config.bootstrap_peers().to_vec(),
        })
    }

    pub fn host(&self) -> &Arc<UdpPeerHost> {
        &self.host
    }

    /// Sender for the inbound peer channel.
    pub fn peer_sender(&self) -> mpsc::Sender<Peer> {
        self.peer_tx.clone()
    }

    pub fn is_running(&self) -> bool {
        self.service.is_running()
    }

    /// Start the staking consumer and the discovery loop, then push the
    /// bootstrap peers.
    pub async fn start(&mut self) -> Result<()> {
        let staking_rx = self
            .staking_rx
            .take()
            .context("Node runtime already started")?;
        self.staking_task = Some(tokio::spawn(consume_staking(staking_rx)));

        self.service.start()?;

        let me = self.host.get_self_peer();
        info!(
            "[qc-01] Node {} listening, rendezvous '{}'",
            me,
            self.service.rendezvous()
        );

        for peer in self.bootstrap.drain(..) {
            info!(peer = %peer, "Queueing bootstrap peer");
            self.peer_tx
                .send(peer)
                .await
                .context("Discovery loop closed its inbound channel")?;
        }

        Ok(())
    }

    /// Stop the discovery loop and wait for the staking consumer to drain.
    pub async fn shutdown(mut self) -> Result<ShutdownReport> {
        info!("Initiating graceful shutdown...");

        let exit = self.service.stop().await?;
        let stats = self.service.stats();

        // The loop task owned the forward sender, so the consumer now sees
        // the channel close.
        let staked = match self.staking_task.take() {
            Some(task) => task.await.context("Staking consumer panicked")?,
            None => 0,
        };

        info!(
            exit = ?exit,
            received = stats.peers_received,
            forwarded = stats.peers_forwarded,
            ping_failures = stats.ping_failures,
            staked,
            "Shutdown complete"
        );

        Ok(ShutdownReport {
            exit,
            stats,
            staked,
        })
    }
}

/// Stand-in for the staking workflow: logs every forwarded peer.
async fn consume_staking(mut staking_rx: mpsc::Receiver<Peer>) -> u64 {
    let mut staked = 0u64;
    while let Some(peer) = staking_rx.recv().await {
        staked += 1;
        info!(peer = %peer, total = staked, "Peer handed to staking");
    }
    if staked == 0 {
        warn!("Staking consumer closed without receiving any peer");
    }
    staked
}
