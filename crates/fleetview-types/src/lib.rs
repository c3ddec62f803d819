//! Shared types for fleetview
//!
//! This crate contains the plain data produced by a fleet collection run and
//! consumed by the display layer.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Node label used to derive pool membership unless configured otherwise
pub const DEFAULT_POOL_LABEL: &str = "pool";

// ============================================================================
// Kubernetes Resource Types
// ============================================================================

/// Kubernetes context information
#[derive(Clone, Debug, Serialize)]
pub struct ContextInfo {
    pub name: String,
    pub cluster: String,
    pub user: String,
    pub namespace: Option<String>,
    pub is_current: bool,
}

impl ContextInfo {
    pub fn new(
        name: String,
        cluster: String,
        user: String,
        namespace: Option<String>,
        is_current: bool,
    ) -> Self {
        Self {
            name,
            cluster,
            user,
            namespace,
            is_current,
        }
    }

    /// A context known only by name
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name.into(), String::new(), String::new(), None, false)
    }
}

/// Node information
#[derive(Clone, Debug, Serialize)]
pub struct NodeInfo {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    pub ready: bool,
}

impl NodeInfo {
    pub fn new(name: String) -> Self {
        Self {
            name,
            labels: BTreeMap::new(),
            ready: false,
        }
    }

    /// Add a label, builder style
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}

/// Pod information
#[derive(Clone, Debug, Serialize)]
pub struct PodInfo {
    pub name: String,
    pub namespace: String,
    pub status: PodStatus,
    pub node_name: Option<String>,
}

impl PodInfo {
    pub fn new(name: String, namespace: String) -> Self {
        Self {
            name,
            namespace,
            status: PodStatus::Unknown,
            node_name: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PodStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown,
}

impl From<&str> for PodStatus {
    fn from(s: &str) -> Self {
        match s {
            "Pending" => Self::Pending,
            "Running" => Self::Running,
            "Succeeded" => Self::Succeeded,
            "Failed" => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

// ============================================================================
// Collection Results
// ============================================================================

/// Everything read from one cluster when all of its queries succeeded
#[derive(Clone, Debug, Serialize)]
pub struct ClusterInventory {
    /// API server the client was bound to
    pub endpoint: String,
    pub nodes: Vec<NodeInfo>,
    pub pods: Vec<PodInfo>,
}

/// Outcome of querying a single context: either the full inventory or the
/// first error encountered, never both
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ClusterOutcome {
    Ready(ClusterInventory),
    Failed { error: ClusterError },
}

impl From<Result<ClusterInventory, ClusterError>> for ClusterOutcome {
    fn from(result: Result<ClusterInventory, ClusterError>) -> Self {
        match result {
            Ok(inventory) => Self::Ready(inventory),
            Err(error) => Self::Failed { error },
        }
    }
}

/// The result recorded for one context in a collection run
#[derive(Clone, Debug, Serialize)]
pub struct ClusterState {
    pub context: String,
    pub is_current: bool,
    #[serde(flatten)]
    pub outcome: ClusterOutcome,
}

impl ClusterState {
    pub fn new(context: String, is_current: bool, outcome: ClusterOutcome) -> Self {
        Self {
            context,
            is_current,
            outcome,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.outcome, ClusterOutcome::Ready(_))
    }

    pub fn inventory(&self) -> Option<&ClusterInventory> {
        match &self.outcome {
            ClusterOutcome::Ready(inventory) => Some(inventory),
            ClusterOutcome::Failed { .. } => None,
        }
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.inventory().map(|i| i.endpoint.as_str())
    }

    pub fn nodes(&self) -> Option<&[NodeInfo]> {
        self.inventory().map(|i| i.nodes.as_slice())
    }

    pub fn pods(&self) -> Option<&[PodInfo]> {
        self.inventory().map(|i| i.pods.as_slice())
    }

    pub fn error(&self) -> Option<&ClusterError> {
        match &self.outcome {
            ClusterOutcome::Ready(_) => None,
            ClusterOutcome::Failed { error } => Some(error),
        }
    }

    /// Pool summary for a successful result
    pub fn summary(&self, pool_label: &str) -> Option<ClusterSummary> {
        self.inventory()
            .map(|inventory| ClusterSummary::from_inventory(inventory, pool_label))
    }

    /// Format node/pod counts as "nodes/pods"
    pub fn counts(&self) -> Option<String> {
        self.inventory()
            .map(|i| format!("{}/{}", i.nodes.len(), i.pods.len()))
    }
}

/// All results of one collection run, one per enumerated context
///
/// Order follows task completion and carries no meaning.
#[derive(Clone, Debug, Serialize)]
pub struct FleetSnapshot {
    pub collected_at: DateTime<Utc>,
    pub clusters: Vec<ClusterState>,
}

impl FleetSnapshot {
    pub fn new(collected_at: DateTime<Utc>, clusters: Vec<ClusterState>) -> Self {
        Self {
            collected_at,
            clusters,
        }
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClusterState> {
        self.clusters.iter()
    }

    /// Look up the result for a context
    pub fn get(&self, context: &str) -> Option<&ClusterState> {
        self.clusters.iter().find(|c| c.context == context)
    }

    /// Number of contexts whose queries all succeeded
    pub fn succeeded(&self) -> usize {
        self.clusters.iter().filter(|c| c.is_ready()).count()
    }

    /// Number of contexts recorded as failures
    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    /// Sort results by context name (for stable display)
    pub fn sort_by_context(&mut self) {
        self.clusters.sort_by(|a, b| a.context.cmp(&b.context));
    }
}

impl<'a> IntoIterator for &'a FleetSnapshot {
    type Item = &'a ClusterState;
    type IntoIter = std::slice::Iter<'a, ClusterState>;

    fn into_iter(self) -> Self::IntoIter {
        self.clusters.iter()
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Inventory listed by a cluster query
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Nodes,
    Pods,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nodes => f.write_str("nodes"),
            Self::Pods => f.write_str("pods"),
        }
    }
}

/// Failure recorded for a single context
///
/// Causes are kept as rendered messages so results stay cloneable.
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClusterError {
    #[error("could not resolve config for context {context:?}: {message}")]
    ConfigResolution { context: String, message: String },

    #[error("could not build client for context {context:?}: {message}")]
    ClientConstruction { context: String, message: String },

    #[error("error getting {resource} for {context}: {message}")]
    Query {
        context: String,
        resource: Resource,
        message: String,
    },

    #[error("timed out after {after:?} querying {context}")]
    Timeout { context: String, after: Duration },

    #[error("collection task for {context} panicked")]
    TaskPanicked { context: String },
}

impl ClusterError {
    /// The context this error belongs to
    pub fn context(&self) -> &str {
        match self {
            Self::ConfigResolution { context, .. }
            | Self::ClientConstruction { context, .. }
            | Self::Query { context, .. }
            | Self::Timeout { context, .. }
            | Self::TaskPanicked { context } => context,
        }
    }
}

// ============================================================================
// Pool Summary
// ============================================================================

/// Derived per-cluster statistics for display
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ClusterSummary {
    /// Pool name to member node names
    pub pools: BTreeMap<String, BTreeSet<String>>,
    pub total_nodes: usize,
    pub ready_nodes: usize,
    pub total_pods: usize,
    pub running_pods: usize,
}

impl ClusterSummary {
    pub fn from_inventory(inventory: &ClusterInventory, pool_label: &str) -> Self {
        Self {
            pools: group_by_pool(&inventory.nodes, pool_label),
            total_nodes: inventory.nodes.len(),
            ready_nodes: inventory.nodes.iter().filter(|n| n.ready).count(),
            total_pods: inventory.pods.len(),
            running_pods: inventory
                .pods
                .iter()
                .filter(|p| p.status == PodStatus::Running)
                .count(),
        }
    }

    /// Number of distinct pools
    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }
}

/// Group node names by the value of `pool_label`
///
/// Nodes without the label belong to no group.
pub fn group_by_pool(nodes: &[NodeInfo], pool_label: &str) -> BTreeMap<String, BTreeSet<String>> {
    let mut pools: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for node in nodes {
        if let Some(pool) = node.labels.get(pool_label) {
            pools
                .entry(pool.clone())
                .or_default()
                .insert(node.name.clone());
        }
    }
    pools
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inventory(nodes: Vec<NodeInfo>, pods: usize) -> ClusterInventory {
        ClusterInventory {
            endpoint: "https://10.0.0.1:6443".to_string(),
            nodes,
            pods: (0..pods)
                .map(|i| PodInfo::new(format!("pod-{i}"), "default".to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_group_by_pool_excludes_unlabeled() {
        let nodes = vec![
            NodeInfo::new("a".to_string()).with_label("pool", "x"),
            NodeInfo::new("b".to_string()).with_label("pool", "x"),
            NodeInfo::new("c".to_string()),
        ];

        let pools = group_by_pool(&nodes, DEFAULT_POOL_LABEL);

        assert_eq!(pools.len(), 1);
        let members: Vec<&str> = pools["x"].iter().map(String::as_str).collect();
        assert_eq!(members, vec!["a", "b"]);
    }

    #[test]
    fn test_summary_counts() {
        let mut nodes: Vec<NodeInfo> = (0..5)
            .map(|i| NodeInfo::new(format!("node-{i}")).with_label("pool", "blue"))
            .collect();
        nodes[0].ready = true;
        nodes.push(NodeInfo::new("gpu-0".to_string()).with_label("pool", "gpu"));
        let mut inv = inventory(nodes, 20);
        inv.pods[3].status = PodStatus::Running;

        let summary = ClusterSummary::from_inventory(&inv, DEFAULT_POOL_LABEL);

        assert_eq!(summary.total_nodes, 6);
        assert_eq!(summary.ready_nodes, 1);
        assert_eq!(summary.total_pods, 20);
        assert_eq!(summary.running_pods, 1);
        assert_eq!(summary.pool_count(), 2);
        assert_eq!(summary.pools["blue"].len(), 5);
    }

    #[test]
    fn test_summary_custom_label() {
        let nodes = vec![
            NodeInfo::new("a".to_string()).with_label("pool", "x"),
            NodeInfo::new("b".to_string()).with_label("agentpool", "system"),
        ];
        let summary = ClusterSummary::from_inventory(&inventory(nodes, 0), "agentpool");

        assert_eq!(summary.pool_count(), 1);
        assert!(summary.pools["system"].contains("b"));
    }

    #[test]
    fn test_cluster_state_accessors() {
        let ready = ClusterState::new(
            "prod".to_string(),
            true,
            ClusterOutcome::Ready(inventory(vec![NodeInfo::new("n".to_string())], 2)),
        );
        assert!(ready.is_ready());
        assert!(ready.error().is_none());
        assert_eq!(ready.endpoint(), Some("https://10.0.0.1:6443"));
        assert_eq!(ready.counts().as_deref(), Some("1/2"));

        let failed = ClusterState::new(
            "staging".to_string(),
            false,
            ClusterOutcome::from(Err::<ClusterInventory, _>(ClusterError::Timeout {
                context: "staging".to_string(),
                after: Duration::from_secs(30),
            })),
        );
        assert!(!failed.is_ready());
        assert!(failed.nodes().is_none());
        assert!(failed.pods().is_none());
        assert!(failed.summary(DEFAULT_POOL_LABEL).is_none());
        assert_eq!(failed.error().map(ClusterError::context), Some("staging"));
    }

    #[test]
    fn test_snapshot_counts_and_sort() {
        let mut snapshot = FleetSnapshot::new(
            Utc::now(),
            vec![
                ClusterState::new(
                    "zeta".to_string(),
                    false,
                    ClusterOutcome::Ready(inventory(Vec::new(), 0)),
                ),
                ClusterState::new(
                    "alpha".to_string(),
                    false,
                    ClusterOutcome::Failed {
                        error: ClusterError::TaskPanicked {
                            context: "alpha".to_string(),
                        },
                    },
                ),
            ],
        );

        assert_eq!(snapshot.succeeded(), 1);
        assert_eq!(snapshot.failed(), 1);
        snapshot.sort_by_context();
        assert_eq!(snapshot.clusters[0].context, "alpha");
        assert!(snapshot.get("zeta").is_some_and(ClusterState::is_ready));
    }

    #[test]
    fn test_error_messages() {
        let err = ClusterError::Query {
            context: "prod".to_string(),
            resource: Resource::Pods,
            message: "forbidden".to_string(),
        };
        assert_eq!(err.to_string(), "error getting pods for prod: forbidden");
    }

    #[test]
    fn test_serialized_outcome_is_tagged() {
        let failed = ClusterState::new(
            "staging".to_string(),
            false,
            ClusterOutcome::Failed {
                error: ClusterError::ConfigResolution {
                    context: "staging".to_string(),
                    message: "no such context".to_string(),
                },
            },
        );
        let value = serde_json::to_value(&failed).unwrap();

        assert_eq!(value["context"], "staging");
        assert_eq!(value["status"], "failed");
        assert_eq!(value["error"]["kind"], "config_resolution");
        assert!(value.get("nodes").is_none());
    }
}
