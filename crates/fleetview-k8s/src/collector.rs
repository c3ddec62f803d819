//! Concurrent collection of node and pod inventory across contexts

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::FutureExt;
use parking_lot::Mutex;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::provider::{ClientProvisioner, ClusterApi, Connection, ContextStore};
use crate::{
    ClusterError, ClusterInventory, ClusterOutcome, ClusterState, CollectError, FleetSnapshot,
    Resource,
};

/// Default deadline for querying a single context
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Tuning for a collection run
#[derive(Clone, Debug)]
pub struct CollectOptions {
    /// Deadline for one context's whole pipeline (None = wait forever)
    pub timeout: Option<Duration>,

    /// Maximum number of contexts queried at once (None = all at once)
    pub max_concurrency: Option<usize>,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            timeout: Some(DEFAULT_TIMEOUT),
            max_concurrency: None,
        }
    }
}

/// Queries every configured context concurrently
pub struct FleetCollector<P> {
    provisioner: Arc<P>,
    options: CollectOptions,
}

impl<P> FleetCollector<P>
where
    P: ContextStore + ClientProvisioner,
{
    pub fn new(provisioner: P) -> Self {
        Self {
            provisioner: Arc::new(provisioner),
            options: CollectOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CollectOptions) -> Self {
        self.options = options;
        self
    }

    /// Collect one result per context
    ///
    /// Returns once every per-context task has finished. Only a failure to
    /// enumerate the contexts is returned as an error.
    pub async fn collect_all(&self) -> Result<FleetSnapshot, CollectError> {
        let contexts = self.provisioner.contexts()?;
        let started = Utc::now();
        info!(contexts = contexts.len(), "Collecting fleet state");

        let results = SnapshotBuilder::with_capacity(contexts.len());
        let limiter = self
            .options
            .max_concurrency
            .map(|n| Arc::new(Semaphore::new(n.max(1))));
        let mut tasks = JoinSet::new();

        for ctx in contexts {
            let provisioner = Arc::clone(&self.provisioner);
            let results = results.clone();
            let limiter = limiter.clone();
            let timeout = self.options.timeout;

            tasks.spawn(async move {
                // Held until the result is recorded
                let _permit = match limiter {
                    Some(limiter) => limiter.acquire_owned().await.ok(),
                    None => None,
                };

                debug!(context = %ctx.name, "Fetching cluster state");
                let outcome = query_guarded(provisioner.as_ref(), &ctx.name, timeout).await;
                if let ClusterOutcome::Failed { error } = &outcome {
                    warn!(context = %ctx.name, %error, "Cluster query failed");
                }

                results.record(ClusterState::new(ctx.name, ctx.is_current, outcome));
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "Collection task did not complete");
            }
        }

        let snapshot = results.finish(started);
        info!(
            succeeded = snapshot.succeeded(),
            failed = snapshot.failed(),
            "Fleet collection finished"
        );
        Ok(snapshot)
    }
}

/// Shared result list written by every per-context task
///
/// `record` is the only write path and holds the lock for each append.
#[derive(Clone)]
struct SnapshotBuilder {
    clusters: Arc<Mutex<Vec<ClusterState>>>,
}

impl SnapshotBuilder {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            clusters: Arc::new(Mutex::new(Vec::with_capacity(capacity))),
        }
    }

    fn record(&self, state: ClusterState) {
        self.clusters.lock().push(state);
    }

    fn finish(self, collected_at: chrono::DateTime<Utc>) -> FleetSnapshot {
        let clusters = match Arc::try_unwrap(self.clusters) {
            Ok(clusters) => clusters.into_inner(),
            Err(shared) => std::mem::take(&mut *shared.lock()),
        };
        FleetSnapshot::new(collected_at, clusters)
    }
}

/// Run one context's pipeline under its deadline, turning panics into failures
async fn query_guarded<P: ClientProvisioner>(
    provisioner: &P,
    context: &str,
    timeout: Option<Duration>,
) -> ClusterOutcome {
    let pipeline = AssertUnwindSafe(query_cluster(provisioner, context)).catch_unwind();

    let finished = match timeout {
        Some(after) => match tokio::time::timeout(after, pipeline).await {
            Ok(finished) => finished,
            Err(_) => {
                return ClusterOutcome::Failed {
                    error: ClusterError::Timeout {
                        context: context.to_string(),
                        after,
                    },
                };
            }
        },
        None => pipeline.await,
    };

    match finished {
        Ok(result) => result.into(),
        Err(_) => ClusterOutcome::Failed {
            error: ClusterError::TaskPanicked {
                context: context.to_string(),
            },
        },
    }
}

/// Provision a client, then list nodes and pods; stops at the first failure
async fn query_cluster<P: ClientProvisioner>(
    provisioner: &P,
    context: &str,
) -> Result<ClusterInventory, ClusterError> {
    let Connection { endpoint, api } = provisioner.get_client(context).await?;

    let nodes = api
        .list_nodes()
        .await
        .map_err(|e| query_error(context, Resource::Nodes, e))?;

    let pods = api
        .list_pods()
        .await
        .map_err(|e| query_error(context, Resource::Pods, e))?;

    Ok(ClusterInventory {
        endpoint,
        nodes,
        pods,
    })
}

fn query_error(context: &str, resource: Resource, e: anyhow::Error) -> ClusterError {
    ClusterError::Query {
        context: context.to_string(),
        resource,
        message: format!("{:#}", e),
    }
}
