//! Tool settings
//!
//! Everything ks needs to know about its environment is resolved once at
//! startup into a [`Settings`] value:
//! 1. Built-in defaults
//! 2. Environment (HOME, KSPATH, KUBECONFIG, SHELL)

mod defaults;
mod settings;

pub use defaults::{BuiltinDefaults, KSPATH_ENV, KUBECONFIG_ENV, LOG_ENV, SHELL_ENV};
pub use settings::{parse_search_paths, ConfigError, SearchPath, Settings};
