//! ks - merged kubeconfig from a search path
//!
//! Finds every kubeconfig under the directories and files listed in KSPATH,
//! merges them with earlier entries taking precedence, and writes the result
//! to `~/.ks/config`. The context and namespace selected before a remerge are
//! carried over to the new master config.

pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod reconcile;

pub use config::{SearchPath, Settings};
pub use engine::{discover, merge, Classification, MergedConfig, PrecedenceList};
pub use error::KsError;
pub use pipeline::{run_startup, StartupReport};
pub use reconcile::{capture_active_state, reconcile, ActiveState, ReconcileOutcome};
