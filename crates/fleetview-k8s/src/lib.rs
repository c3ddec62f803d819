//! Kubernetes client for fleetview
//!
//! This crate resolves kubeconfig contexts into API clients and collects the
//! node and pod inventory of every context concurrently.

mod client;
mod collector;
mod error;
mod provider;

pub use client::{KubeCluster, KubeConfigStore};
pub use collector::{CollectOptions, DEFAULT_TIMEOUT, FleetCollector};
pub use error::CollectError;
pub use provider::{ClientProvisioner, ClusterApi, Connection, ContextStore};

// Re-export types that are used in our public API
pub use fleetview_types::{
    ClusterError, ClusterInventory, ClusterOutcome, ClusterState, ContextInfo, FleetSnapshot,
    NodeInfo, PodInfo, PodStatus, Resource,
};
