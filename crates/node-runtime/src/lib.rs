//! # Node Runtime Library
//!
//! This library exposes the internal modules of the node runtime for testing.
//! The main entry point is the `main.rs` binary.
//!
//! - `config`: configuration file plus environment overrides
//! - `runtime`: host, channels, staking consumer and discovery lifecycle

pub mod config;
pub mod runtime;

pub use config::{load_config, load_config_with, CONFIG_ENV, P2P_BIND_ENV, RENDEZVOUS_ENV};
pub use runtime::NodeRuntime;
