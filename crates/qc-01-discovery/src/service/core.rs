use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::info;

use crate::domain::{
    DiscoveryConfig, DiscoveryError, DiscoveryStats, ForwardPolicy, LoopExit, Peer, Rendezvous,
};
use crate::ports::{DiscoveryLifecycle, ForwardAll, ForwardFilter, PeerHost};

use super::event_loop::{DiscoveryLoop, PeerProcessor};
use super::metrics::DiscoveryMetrics;

/// Peer discovery forwarding service.
///
/// Consumes discovered peers from an injected channel, registers each with
/// the host, pings it and forwards it to the staking channel. The channel
/// ends are owned by the caller; the service never closes them.
///
/// Dropping a started service ends discovery: the loop sees the stop sender
/// go away and exits with [`LoopExit::ControllerDropped`]. Keep the service
/// alive for as long as peers should be processed.
///
/// # Example
///
/// ```rust,ignore
/// let (peer_tx, peer_rx) = mpsc::channel(128);
/// let (staking_tx, staking_rx) = mpsc::channel(16);
///
/// let mut service = DiscoveryService::new(host, "shard-0", peer_rx, staking_tx);
/// service.start()?;
///
/// peer_tx.send(peer).await?;
/// let forwarded = staking_rx.recv().await;
///
/// service.stop().await?;
/// ```
pub struct DiscoveryService<H: PeerHost> {
    /// Host registry and transport
    host: Arc<H>,
    /// Opaque overlay label
    rendezvous: Rendezvous,
    /// Backpressure behavior of the forward step
    forward_policy: ForwardPolicy,
    /// Conditional forwarding hook
    filter: Arc<dyn ForwardFilter>,
    /// Counters shared with the loop task
    metrics: Arc<DiscoveryMetrics>,
    /// Injected channel ends, held until the loop is spawned
    channels: Option<(mpsc::Receiver<Peer>, mpsc::Sender<Peer>)>,
    /// Stop signal, consumed by the first `stop`
    stop_tx: Option<oneshot::Sender<()>>,
    /// Loop task
    handle: Option<JoinHandle<LoopExit>>,
}

impl<H: PeerHost> DiscoveryService<H> {
    /// Create a discovery service.
    ///
    /// # Arguments
    ///
    /// * `host` - The P2P host (shared with other subsystems)
    /// * `rendezvous` - Overlay label; we start with the shard id
    /// * `peer_rx` - Inbound peer-arrival channel
    /// * `staking_tx` - Forward channel read by the staking workflow
    pub fn new(
        host: Arc<H>,
        rendezvous: impl Into<Rendezvous>,
        peer_rx: mpsc::Receiver<Peer>,
        staking_tx: mpsc::Sender<Peer>,
    ) -> Self {
        Self {
            host,
            rendezvous: rendezvous.into(),
            forward_policy: ForwardPolicy::Block,
            filter: Arc::new(ForwardAll),
            metrics: Arc::new(DiscoveryMetrics::default()),
            channels: Some((peer_rx, staking_tx)),
            stop_tx: None,
            handle: None,
        }
    }

    /// Create a discovery service using the label and policy from `config`.
    pub fn from_config(
        host: Arc<H>,
        config: &DiscoveryConfig,
        peer_rx: mpsc::Receiver<Peer>,
        staking_tx: mpsc::Sender<Peer>,
    ) -> Self {
        Self::new(host, config.rendezvous.clone(), peer_rx, staking_tx)
            .with_forward_policy(config.forward_policy)
    }

    #[must_use]
    pub fn with_forward_policy(mut self, policy: ForwardPolicy) -> Self {
        self.forward_policy = policy;
        self
    }

    #[must_use]
    pub fn with_forward_filter(mut self, filter: impl ForwardFilter) -> Self {
        self.filter = Arc::new(filter);
        self
    }

    /// The host this service registers peers with.
    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    pub fn forward_policy(&self) -> ForwardPolicy {
        self.forward_policy
    }

    /// Initialization hook, called by `start`.
    pub fn init(&self) {
        info!(rendezvous = %self.rendezvous, "[qc-01] Init discovery service");
    }

    /// Spawn the discovery loop on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn run(&mut self) -> Result<(), DiscoveryError> {
        let (peer_rx, staking_tx) = self.channels.take().ok_or(DiscoveryError::AlreadyStarted)?;
        let (stop_tx, stop_rx) = oneshot::channel();

        let event_loop = DiscoveryLoop {
            peer_rx,
            stop_rx,
            processor: PeerProcessor {
                host: Arc::clone(&self.host),
                rendezvous: self.rendezvous.clone(),
                staking_tx,
                forward_policy: self.forward_policy,
                filter: Arc::clone(&self.filter),
                metrics: Arc::clone(&self.metrics),
            },
        };

        self.stop_tx = Some(stop_tx);
        self.handle = Some(tokio::spawn(event_loop.run()));
        Ok(())
    }
}

#[async_trait]
impl<H: PeerHost> DiscoveryLifecycle for DiscoveryService<H> {
    fn start(&mut self) -> Result<(), DiscoveryError> {
        if self.channels.is_none() {
            return Err(DiscoveryError::AlreadyStarted);
        }
        info!("[qc-01] Starting discovery service");
        self.init();
        self.run()
    }

    async fn stop(&mut self) -> Result<LoopExit, DiscoveryError> {
        let handle = self.handle.take().ok_or(DiscoveryError::NotRunning)?;
        info!("[qc-01] Shutting down discovery service");

        if let Some(stop_tx) = self.stop_tx.take() {
            // Err means the loop already returned and dropped its receiver.
            let _ = stop_tx.send(());
        }

        let exit = handle
            .await
            .map_err(|e| DiscoveryError::LoopPanicked(e.to_string()))?;
        info!(?exit, "[qc-01] Discovery service stopped");
        Ok(exit)
    }

    fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn rendezvous(&self) -> &Rendezvous {
        &self.rendezvous
    }

    fn stats(&self) -> DiscoveryStats {
        self.metrics.snapshot()
    }
}
