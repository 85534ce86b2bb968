//! Error types for kubeconfig parsing and encoding.

use std::io;
use std::path::PathBuf;

/// Errors raised while reading, parsing or writing a kubeconfig.
#[derive(Debug, thiserror::Error)]
pub enum KubeconfigError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("YAML parse error: {0}")]
    Parse(#[source] serde_yaml::Error),

    #[error("Not a kubeconfig: {0}")]
    NotAKubeconfig(String),

    #[error("Failed to encode kubeconfig as YAML: {0}")]
    Encode(#[source] serde_yaml::Error),
}

impl KubeconfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
