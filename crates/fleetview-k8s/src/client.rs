//! Kubeconfig-backed context store and client provisioning

use std::path::PathBuf;

use anyhow::{Context, Result};
use k8s_openapi::api::core::v1::{Node, Pod};
use kube::Api;
use kube::api::ListParams;
use kube::config::{KubeConfigOptions, Kubeconfig, KubeconfigError};

use crate::provider::{ClientProvisioner, ClusterApi, Connection, ContextStore};
use crate::{ClusterError, CollectError, ContextInfo, NodeInfo, PodInfo, PodStatus};

/// Context store reading a kubeconfig file
///
/// The kubeconfig is re-read on every call so that repeated collections
/// observe edits to the file.
#[derive(Clone, Debug, Default)]
pub struct KubeConfigStore {
    path: Option<PathBuf>,
}

impl KubeConfigStore {
    /// Use kube's standard resolution (`KUBECONFIG`, then `~/.kube/config`)
    pub fn new() -> Self {
        Self { path: None }
    }

    /// Read the kubeconfig from an explicit path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    fn load(&self) -> Result<Kubeconfig, KubeconfigError> {
        match &self.path {
            Some(path) => Kubeconfig::read_from(path),
            None => Kubeconfig::read(),
        }
    }

    /// Resolve a context into client configuration without building a client
    pub async fn resolve(&self, context_name: &str) -> Result<kube::Config, ClusterError> {
        let kubeconfig = self
            .load()
            .map_err(|e| ClusterError::ConfigResolution {
                context: context_name.to_string(),
                message: e.to_string(),
            })?;

        let options = KubeConfigOptions {
            context: (!context_name.is_empty()).then(|| context_name.to_string()),
            ..Default::default()
        };

        kube::Config::from_custom_kubeconfig(kubeconfig, &options)
            .await
            .map_err(|e| resolve_error(context_name, e))
    }
}

/// Endpoint and certificate parse failures mean the context was found but
/// no client can be built from it
fn resolve_error(context_name: &str, error: KubeconfigError) -> ClusterError {
    let context = context_name.to_string();
    let message = error.to_string();

    match error {
        KubeconfigError::ParseClusterUrl(_)
        | KubeconfigError::ParseProxyUrl(_)
        | KubeconfigError::ParseCertificates(_) => {
            ClusterError::ClientConstruction { context, message }
        }
        _ => ClusterError::ConfigResolution { context, message },
    }
}

/// Map kubeconfig contexts, marking the current one
fn context_infos(kubeconfig: &Kubeconfig) -> Vec<ContextInfo> {
    kubeconfig
        .contexts
        .iter()
        .map(|ctx| {
            let context = ctx.context.as_ref();
            ContextInfo::new(
                ctx.name.clone(),
                context.map(|c| c.cluster.clone()).unwrap_or_default(),
                context.and_then(|c| c.user.clone()).unwrap_or_default(),
                context.and_then(|c| c.namespace.clone()),
                Some(&ctx.name) == kubeconfig.current_context.as_ref(),
            )
        })
        .collect()
}

impl ContextStore for KubeConfigStore {
    fn contexts(&self) -> Result<Vec<ContextInfo>, CollectError> {
        let kubeconfig = self
            .load()
            .map_err(|e| CollectError::ContextEnumeration(e.to_string()))?;
        Ok(context_infos(&kubeconfig))
    }
}

impl ClientProvisioner for KubeConfigStore {
    type Api = KubeCluster;

    async fn get_client(&self, context_name: &str) -> Result<Connection<KubeCluster>, ClusterError> {
        let config = self.resolve(context_name).await?;
        let endpoint = config.cluster_url.to_string();

        let client =
            kube::Client::try_from(config).map_err(|e| ClusterError::ClientConstruction {
                context: context_name.to_string(),
                message: e.to_string(),
            })?;

        Ok(Connection {
            endpoint,
            api: KubeCluster::new(client),
        })
    }
}

/// Inventory queries through a kube client
#[derive(Clone)]
pub struct KubeCluster {
    client: kube::Client,
}

impl KubeCluster {
    pub fn new(client: kube::Client) -> Self {
        Self { client }
    }

    /// Convert a k8s Node to NodeInfo
    fn node_to_info(node: Node) -> NodeInfo {
        let mut info = NodeInfo::new(node.metadata.name.unwrap_or_default());

        if let Some(labels) = node.metadata.labels {
            info.labels = labels;
        }

        info.ready = node
            .status
            .and_then(|s| s.conditions)
            .map(|conditions| {
                conditions
                    .iter()
                    .any(|c| c.type_ == "Ready" && c.status == "True")
            })
            .unwrap_or(false);

        info
    }

    /// Convert a k8s Pod to PodInfo
    fn pod_to_info(pod: Pod) -> PodInfo {
        let name = pod.metadata.name.unwrap_or_default();
        let namespace = pod.metadata.namespace.unwrap_or_default();
        let mut info = PodInfo::new(name, namespace);

        if let Some(spec) = pod.spec {
            info.node_name = spec.node_name;
        }

        info.status = pod
            .status
            .and_then(|s| s.phase)
            .as_deref()
            .map(PodStatus::from)
            .unwrap_or(PodStatus::Unknown);

        info
    }
}

impl ClusterApi for KubeCluster {
    async fn list_nodes(&self) -> Result<Vec<NodeInfo>> {
        let nodes: Api<Node> = Api::all(self.client.clone());
        let list = nodes
            .list(&ListParams::default())
            .await
            .context("Failed to list nodes")?;

        Ok(list.items.into_iter().map(Self::node_to_info).collect())
    }

    async fn list_pods(&self) -> Result<Vec<PodInfo>> {
        let pods: Api<Pod> = Api::all(self.client.clone());
        let list = pods
            .list(&ListParams::default())
            .await
            .context("Failed to list pods")?;

        Ok(list.items.into_iter().map(Self::pod_to_info).collect())
    }
}
