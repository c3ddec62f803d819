use thiserror::Error;

/// Errors that abort a whole collection run
///
/// Failures of individual contexts never surface here; they are recorded as
/// [`ClusterError`](fleetview_types::ClusterError) in the snapshot.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("error loading kubeconfig: {0}")]
    ContextEnumeration(String),
}
