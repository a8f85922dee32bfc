//! # Quantum-Chain Discovery Node
//!
//! Runs the peer discovery forwarding service over UDP.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging (`RUST_LOG`, default `info`)
//! 2. Load configuration (file named by `QC_CONFIG`, then env overrides)
//! 3. Build the runtime and start it
//! 4. Wait for Ctrl+C, then stop the loop and report counters

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use node_runtime::{load_config, NodeRuntime};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("===========================================");
    info!("  Quantum-Chain Discovery Node v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let config = load_config()?;

    let mut runtime = NodeRuntime::new(&config)?;
    runtime.start().await?;

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    let report = runtime.shutdown().await?;
    info!("Final stats: {:?}", report.stats);

    Ok(())
}
