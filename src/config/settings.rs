//! Resolved settings for one ks invocation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::defaults::{BuiltinDefaults, KSPATH_ENV, KUBECONFIG_ENV, SHELL_ENV};

/// One entry of KSPATH: a file or a directory to walk.
///
/// Kept as the raw string; `~` is only expanded when the path is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPath(String);

impl SearchPath {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Replace a leading `~` or `~/` with `home`.
    pub fn expand(&self, home: &Path) -> PathBuf {
        if self.0 == "~" {
            return home.to_path_buf();
        }
        match self.0.strip_prefix("~/") {
            Some(rest) => home.join(rest),
            None => PathBuf::from(&self.0),
        }
    }
}

/// Split a KSPATH value. Order is precedence; empty segments are dropped.
pub fn parse_search_paths(raw: &str) -> Vec<SearchPath> {
    raw.split(':')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(SearchPath::new)
        .collect()
}

/// Settings errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine the home directory")]
    HomeDirUnknown,

    #[error("Error checking {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("KUBECONFIG is not set. Please make sure KUBECONFIG is set correctly.")]
    KubeconfigUnset,
}

/// Paths and environment for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub home_dir: PathBuf,

    /// ~/.ks
    pub ks_home: PathBuf,

    /// Merged output, ~/.ks/config
    pub master_path: PathBuf,

    /// Activation script sourced by the shell rc file, ~/.ks/init.sh
    pub init_script_path: PathBuf,

    /// KSPATH entries, highest precedence first
    pub search_paths: Vec<SearchPath>,

    /// The config the calling shell points at (KUBECONFIG)
    pub prior_config: Option<PathBuf>,

    /// Login shell (SHELL), used by `ks init`
    pub shell: Option<String>,
}

impl Settings {
    /// Resolve settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeDirUnknown)?;
        let kspath = non_empty_var(KSPATH_ENV);
        let prior = non_empty_var(KUBECONFIG_ENV).map(PathBuf::from);

        let mut settings = Self::new(home, kspath.as_deref(), prior);
        settings.shell = non_empty_var(SHELL_ENV);
        Ok(settings)
    }

    /// Build settings from explicit values.
    ///
    /// `kspath` of `None` falls back to the built-in default.
    pub fn new(home_dir: PathBuf, kspath: Option<&str>, prior_config: Option<PathBuf>) -> Self {
        let defaults = BuiltinDefaults::default();
        let ks_home = home_dir.join(&defaults.ks_home_dir);
        let search_paths = parse_search_paths(kspath.unwrap_or(&defaults.kspath));

        Self {
            master_path: ks_home.join(&defaults.master_file),
            init_script_path: ks_home.join(&defaults.init_script_file),
            ks_home,
            home_dir,
            search_paths,
            prior_config,
            shell: None,
        }
    }

    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = Some(shell.into());
        self
    }

    /// Whether `ks init` has run, i.e. the ks directory exists.
    pub fn is_initialized(&self) -> Result<bool, ConfigError> {
        match fs::metadata(&self.ks_home) {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ConfigError::Io {
                path: self.ks_home.clone(),
                source: e,
            }),
        }
    }

    /// The KUBECONFIG path, required by commands that edit a config.
    pub fn require_prior_config(&self) -> Result<&Path, ConfigError> {
        self.prior_config
            .as_deref()
            .ok_or(ConfigError::KubeconfigUnset)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
