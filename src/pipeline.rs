//! Startup pipeline
//!
//! Runs before every command once ks is initialized:
//! capture active state → discover → append master → merge → reconcile →
//! write master. Each run rebuilds the master file from scratch.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::Settings;
use crate::engine::{discover, merge, MergedConfig};
use crate::error::KsError;
use crate::reconcile::{capture_active_state, reconcile, ReconcileOutcome};

/// Summary of one remerge
#[derive(Debug, Clone)]
pub struct StartupReport {
    /// Files merged, highest precedence first (master last when present)
    pub precedence: Vec<PathBuf>,

    /// Whether the previous master file took part in the merge
    pub master_included: bool,

    /// Where the merged config was written
    pub master_path: PathBuf,

    pub outcome: ReconcileOutcome,

    pub merged: MergedConfig,
}

/// Remerge KSPATH into the master config.
///
/// Returns `None` without touching anything when ks is not initialized.
pub fn run_startup(settings: &Settings) -> Result<Option<StartupReport>, KsError> {
    if !settings.is_initialized()? {
        debug!(path = %settings.ks_home.display(), "ks is not initialized, skipping merge");
        return Ok(None);
    }

    // Read the selection before the master file is rewritten
    let prior = capture_active_state(settings.prior_config.as_deref())?;

    let mut list = discover(&settings.search_paths, &settings.home_dir)?;
    let master_included = list.append_master(&settings.master_path)?;

    let mut merged = merge(&list);
    let outcome = reconcile(&mut merged, prior.as_ref());

    merged
        .write_to_file(&settings.master_path)
        .map_err(KsError::Write)?;

    info!(
        path = %settings.master_path.display(),
        files = list.len(),
        contexts = merged.contexts.len(),
        "wrote merged config"
    );

    Ok(Some(StartupReport {
        precedence: list.paths().into_iter().map(PathBuf::from).collect(),
        master_included,
        master_path: settings.master_path.clone(),
        outcome,
        merged,
    }))
}
