//! Context-state reconciliation
//!
//! The context and namespace a user selected must survive a remerge. The
//! active state is captured from the shell's current config before merging
//! and reapplied to the merged config afterwards.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ks_kubeconfig::Kubeconfig;
use tracing::debug;

use crate::engine::{classify, Classification};

/// The context/namespace pair in use before a remerge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveState {
    pub context: String,
    pub namespace: String,
}

/// What reconciliation did to the merged config
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Nothing was active before; the merged current context stands.
    NoPriorState,

    /// The previous context still exists and is current again.
    Restored { context: String, namespace: String },

    /// The previous context is gone; the merged default is in effect.
    FellBack {
        previous: String,
        current: String,
        namespace: String,
    },
}

impl ReconcileOutcome {
    /// User-facing warning, if the user's selection could not be kept.
    pub fn warning(&self) -> Option<String> {
        match self {
            Self::FellBack { .. } => Some(self.to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for ReconcileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPriorState => write!(f, "No previous context to restore."),
            Self::Restored { context, namespace } => write!(
                f,
                r#"Restored context "{}" (namespace: "{}")."#,
                context, namespace
            ),
            Self::FellBack {
                previous,
                current,
                namespace,
            } => write!(
                f,
                r#"Context "{}" no longer exists. Current context is now "{}" (namespace: "{}")."#,
                previous, current, namespace
            ),
        }
    }
}

/// Reconciliation errors
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("Error checking for config at {path}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Read the active context and namespace from the shell's current config.
///
/// Returns `None` when no config is set, the file is missing or not a
/// kubeconfig, or it has no current context.
pub fn capture_active_state(prior: Option<&Path>) -> Result<Option<ActiveState>, ReconcileError> {
    let Some(path) = prior else {
        return Ok(None);
    };

    match fs::metadata(path) {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "previous config no longer exists");
            return Ok(None);
        }
        Err(e) => {
            return Err(ReconcileError::Stat {
                path: path.to_path_buf(),
                source: e,
            })
        }
    }

    let Classification::Kubeconfig(config) = classify(path) else {
        return Ok(None);
    };
    Ok(active_state_of(&config))
}

/// The active state recorded in a loaded config.
pub fn active_state_of(config: &Kubeconfig) -> Option<ActiveState> {
    if config.current_context.is_empty() {
        return None;
    }
    let namespace = config
        .contexts
        .get(&config.current_context)
        .map(|ctx| ctx.namespace.clone())
        .unwrap_or_default();

    Some(ActiveState {
        context: config.current_context.clone(),
        namespace,
    })
}

/// Reapply `prior` to a freshly merged config.
///
/// If the previous context still exists it becomes current again and gets
/// the previous namespace, whatever the merge produced for it. Otherwise the
/// merged current context stays, cleared if it names no merged context.
pub fn reconcile(merged: &mut Kubeconfig, prior: Option<&ActiveState>) -> ReconcileOutcome {
    let Some(prior) = prior else {
        clear_dangling_current(merged);
        return ReconcileOutcome::NoPriorState;
    };

    if let Some(context) = merged.contexts.get_mut(&prior.context) {
        context.namespace = prior.namespace.clone();
        merged.current_context = prior.context.clone();
        return ReconcileOutcome::Restored {
            context: prior.context.clone(),
            namespace: prior.namespace.clone(),
        };
    }

    clear_dangling_current(merged);
    let namespace = merged
        .current()
        .map(|(_, ctx)| ctx.namespace.clone())
        .unwrap_or_default();

    ReconcileOutcome::FellBack {
        previous: prior.context.clone(),
        current: merged.current_context.clone(),
        namespace,
    }
}

fn clear_dangling_current(merged: &mut Kubeconfig) {
    if !merged.current_context.is_empty() && merged.current().is_none() {
        debug!(context = %merged.current_context, "merged current-context names no context, clearing");
        merged.current_context.clear();
    }
}
