//! # Driving Ports (Inbound API)
//!
//! Lifecycle controls the node runtime uses to drive the discovery service.

use async_trait::async_trait;

use crate::domain::{DiscoveryError, DiscoveryStats, LoopExit, Rendezvous};

/// Lifecycle API for the discovery service.
///
/// # Example
///
/// ```rust,ignore
/// use qc_01_discovery::ports::DiscoveryLifecycle;
///
/// async fn restart_guard<T: DiscoveryLifecycle>(svc: &mut T) {
///     svc.start()?;
///     // ... node runs ...
///     let exit = svc.stop().await?;
///     tracing::info!(?exit, "discovery finished");
/// }
/// ```
#[async_trait]
pub trait DiscoveryLifecycle: Send {
    /// Spawn the discovery loop and return immediately.
    ///
    /// # Errors
    ///
    /// `AlreadyStarted` if the loop was spawned before. The inbound channel is
    /// consumed by the first start, so a service cannot be restarted.
    fn start(&mut self) -> Result<(), DiscoveryError>;

    /// Signal the loop to stop and wait until it has exited.
    ///
    /// The stop signal is delivered at most once. If the loop already exited
    /// on its own (inbound channel closed), this returns that exit reason
    /// without blocking.
    ///
    /// # Errors
    ///
    /// - `NotRunning` if never started or already stopped
    /// - `LoopPanicked` if the loop task did not finish cleanly
    async fn stop(&mut self) -> Result<LoopExit, DiscoveryError>;

    /// `true` between a successful `start` and loop exit.
    fn is_running(&self) -> bool;

    /// Overlay label this service was created with.
    fn rendezvous(&self) -> &Rendezvous;

    /// Snapshot of the processing counters.
    fn stats(&self) -> DiscoveryStats;
}
