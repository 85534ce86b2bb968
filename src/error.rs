//! Top-level error type for a ks invocation.

use ks_kubeconfig::KubeconfigError;

use crate::commands::CommandError;
use crate::config::ConfigError;
use crate::engine::DiscoveryError;
use crate::reconcile::ReconcileError;

/// Any error that aborts the invocation
#[derive(Debug, thiserror::Error)]
pub enum KsError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error("Error writing config: {0}")]
    Write(#[source] KubeconfigError),

    #[error(transparent)]
    Command(#[from] CommandError),
}
