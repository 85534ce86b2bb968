//! Commands run after the startup merge
//!
//! Context commands edit the config named by KUBECONFIG and write it back.
//! Shell commands manage the ks directory and the activation script.

mod contexts;
mod shell;
mod whence;

pub use contexts::{
    current_context, delete_contexts, list_contexts, new_context, rename_context,
    switch_context, ContextListing, ContextSummary, Created, Deleted, NewContext, Renamed,
    Switched,
};
pub use shell::{activate, deactivate, init, Activated, Initialized};
pub use whence::{whence, WhenceEntry, WhenceReport};

use std::io;
use std::path::{Path, PathBuf};

use ks_kubeconfig::{Kubeconfig, KubeconfigError};

use crate::config::Settings;

/// Command errors
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("No such context: {0}")]
    NoSuchContext(String),

    #[error("A context already exists with the name {0}")]
    ContextExists(String),

    #[error("No cluster exists with name {0}")]
    NoSuchCluster(String),

    #[error("No user exists with name {0}")]
    NoSuchUser(String),

    #[error("Already initialized. Use --force flag to for reinitialization.")]
    AlreadyInitialized,

    #[error("Unknown shell: {0}")]
    UnknownShell(String),

    #[error("Error loading config from {path}: {source}. Please make sure KUBECONFIG is set correctly.")]
    Load {
        path: PathBuf,
        #[source]
        source: KubeconfigError,
    },

    #[error("Error writing config to {path}: {source}")]
    Store {
        path: PathBuf,
        #[source]
        source: KubeconfigError,
    },

    #[error("Error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error serializing output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load the config the shell points at. Returns its path alongside.
pub fn load_active_config(settings: &Settings) -> Result<(PathBuf, Kubeconfig), crate::KsError> {
    let path = settings.require_prior_config()?;
    let config = Kubeconfig::load_from_file(path).map_err(|e| CommandError::Load {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok((path.to_path_buf(), config))
}

/// Write an edited config back to where it was loaded from.
pub fn store_config(path: &Path, config: &Kubeconfig) -> Result<(), CommandError> {
    config.write_to_file(path).map_err(|e| CommandError::Store {
        path: path.to_path_buf(),
        source: e,
    })
}
