//! Built-in defaults
//!
//! Locations used when the environment does not say otherwise.

/// Environment variable holding the colon-separated search path.
pub const KSPATH_ENV: &str = "KSPATH";

/// Environment variable naming the config the current shell uses.
pub const KUBECONFIG_ENV: &str = "KUBECONFIG";

/// Environment variable holding the login shell.
pub const SHELL_ENV: &str = "SHELL";

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "KS_LOG";

/// Built-in default locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinDefaults {
    /// Search path used when KSPATH is unset (default: "~/.kube")
    pub kspath: String,

    /// Directory under $HOME holding ks state (default: ".ks")
    pub ks_home_dir: String,

    /// Master config file name inside the ks directory (default: "config")
    pub master_file: String,

    /// Shell activation script inside the ks directory (default: "init.sh")
    pub init_script_file: String,

    /// Log filter used when KS_LOG is unset (default: "warn")
    pub log_filter: String,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            kspath: "~/.kube".to_string(),
            ks_home_dir: ".ks".to_string(),
            master_file: "config".to_string(),
            init_script_file: "init.sh".to_string(),
            log_filter: "warn".to_string(),
        }
    }
}
