//! Seams between the collector and the cluster access it needs

use std::future::Future;

use fleetview_types::{ClusterError, ContextInfo, NodeInfo, PodInfo};

use crate::CollectError;

/// A client bound to one cluster, plus the API server it talks to
pub struct Connection<A> {
    pub endpoint: String,
    pub api: A,
}

/// Source of the configured contexts
pub trait ContextStore: Send + Sync + 'static {
    /// List every known context
    fn contexts(&self) -> Result<Vec<ContextInfo>, CollectError>;
}

/// Builds a client for a named context
///
/// An empty context name selects the store's current context.
pub trait ClientProvisioner: Send + Sync + 'static {
    type Api: ClusterApi;

    fn get_client(
        &self,
        context: &str,
    ) -> impl Future<Output = Result<Connection<Self::Api>, ClusterError>> + Send;
}

/// Read queries against one cluster's control plane
pub trait ClusterApi: Send + Sync + 'static {
    /// List all nodes
    fn list_nodes(&self) -> impl Future<Output = anyhow::Result<Vec<NodeInfo>>> + Send;

    /// List pods across all namespaces
    fn list_pods(&self) -> impl Future<Output = anyhow::Result<Vec<PodInfo>>> + Send;
}
