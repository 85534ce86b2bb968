//! Keyed kubeconfig model
//!
//! Clusters, users and contexts are kept in name-ordered maps so that the
//! encoded document does not depend on the order files were read in.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::document::Document;
use crate::error::KubeconfigError;
use crate::paths;

/// A named Kubernetes API endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub server: String,

    /// Path to a CA bundle file
    #[serde(
        rename = "certificate-authority",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub certificate_authority: Option<String>,

    /// Fields ks does not interpret (CA data, proxy-url, TLS settings, ...)
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,

    /// File this definition was loaded from
    #[serde(skip)]
    pub location_of_origin: Option<PathBuf>,
}

/// Credentials for a user, stored under `users` on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthInfo {
    #[serde(
        rename = "client-certificate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub client_certificate: Option<String>,

    #[serde(rename = "client-key", default, skip_serializing_if = "Option::is_none")]
    pub client_key: Option<String>,

    #[serde(rename = "tokenFile", default, skip_serializing_if = "Option::is_none")]
    pub token_file: Option<String>,

    /// Tokens, exec plugins, auth providers, ...
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,

    #[serde(skip)]
    pub location_of_origin: Option<PathBuf>,
}

/// A cluster + user + namespace triple.
///
/// `cluster` and `auth_info` are names into the owning config's maps. They
/// are not checked when loading or merging; see [`Kubeconfig::cluster_for`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    #[serde(default)]
    pub cluster: String,

    #[serde(rename = "user", default)]
    pub auth_info: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,

    #[serde(skip)]
    pub location_of_origin: Option<PathBuf>,
}

/// A whole kubeconfig document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Kubeconfig {
    pub preferences: BTreeMap<String, Value>,
    pub clusters: BTreeMap<String, Cluster>,
    pub auth_infos: BTreeMap<String, AuthInfo>,
    pub contexts: BTreeMap<String, Context>,
    /// Empty when no context is selected
    pub current_context: String,
    pub extensions: BTreeMap<String, Value>,
}

impl Kubeconfig {
    /// Parse a kubeconfig from YAML text.
    ///
    /// An empty (or comment-only) document is an empty config. Anything
    /// that is not a mapping, or that declares another `kind`/`apiVersion`,
    /// is rejected.
    pub fn parse(text: &str) -> Result<Self, KubeconfigError> {
        Self::parse_with_origin(text, None)
    }

    fn parse_with_origin(text: &str, origin: Option<&Path>) -> Result<Self, KubeconfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        let value: Value = serde_yaml::from_str(text).map_err(KubeconfigError::Parse)?;
        match value {
            Value::Null => Ok(Self::default()),
            Value::Mapping(_) => {
                let document: Document =
                    serde_yaml::from_value(value).map_err(KubeconfigError::Parse)?;
                document.validate()?;
                Ok(document.into_config(origin))
            }
            other => Err(KubeconfigError::NotAKubeconfig(format!(
                "expected a mapping at the top level, found {}",
                value_kind(&other)
            ))),
        }
    }

    /// Load a kubeconfig file.
    ///
    /// Every entry is stamped with the file's path, and relative certificate
    /// and token paths are made absolute against the file's directory.
    pub fn load_from_file(path: &Path) -> Result<Self, KubeconfigError> {
        let text = fs::read_to_string(path).map_err(|e| KubeconfigError::io(path, e))?;
        let mut config = Self::parse_with_origin(&text, Some(path))?;
        paths::resolve_local_paths(&mut config, &paths::base_dir(path));
        Ok(config)
    }

    /// Encode as a YAML document. Entries are written sorted by name.
    pub fn to_yaml(&self) -> Result<String, KubeconfigError> {
        serde_yaml::to_string(&Document::from_config(self)).map_err(KubeconfigError::Encode)
    }

    /// Rewrite the file at `path` with this config, readable only by its owner.
    pub fn write_to_file(&self, path: &Path) -> Result<(), KubeconfigError> {
        let yaml = self.to_yaml()?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(path).map_err(|e| KubeconfigError::io(path, e))?;
        file.write_all(yaml.as_bytes())
            .map_err(|e| KubeconfigError::io(path, e))
    }

    /// The current context, if one is set and defined.
    pub fn current(&self) -> Option<(&str, &Context)> {
        self.contexts
            .get_key_value(self.current_context.as_str())
            .map(|(name, context)| (name.as_str(), context))
    }

    /// Resolve a context's cluster reference. `None` when it dangles.
    pub fn cluster_for(&self, context: &Context) -> Option<&Cluster> {
        self.clusters.get(&context.cluster)
    }

    /// Resolve a context's user reference. `None` when it dangles.
    pub fn auth_info_for(&self, context: &Context) -> Option<&AuthInfo> {
        self.auth_infos.get(&context.auth_info)
    }

    /// True when the config defines nothing at all.
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
            && self.auth_infos.is_empty()
            && self.contexts.is_empty()
            && self.current_context.is_empty()
            && self.extensions.is_empty()
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
