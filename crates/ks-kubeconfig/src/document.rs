//! Wire form of a kubeconfig
//!
//! Clusters, users and contexts are lists of `{name, <body>}` entries on
//! disk. Field order here is the order they are written in.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

use crate::error::KubeconfigError;
use crate::model::{AuthInfo, Cluster, Context, Kubeconfig};
use crate::{API_VERSION, KIND};

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct Document {
    #[serde(rename = "apiVersion", default, skip_serializing_if = "Option::is_none")]
    api_version: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    clusters: Vec<NamedCluster>,

    #[serde(default, deserialize_with = "null_as_default")]
    contexts: Vec<NamedContext>,

    #[serde(rename = "current-context", default, deserialize_with = "null_as_default")]
    current_context: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    preferences: BTreeMap<String, Value>,

    #[serde(default, deserialize_with = "null_as_default")]
    users: Vec<NamedAuthInfo>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    extensions: Vec<NamedExtension>,
}

#[derive(Debug, Serialize, Deserialize)]
struct NamedCluster {
    name: String,
    cluster: Cluster,
}

#[derive(Debug, Serialize, Deserialize)]
struct NamedAuthInfo {
    name: String,
    user: AuthInfo,
}

#[derive(Debug, Serialize, Deserialize)]
struct NamedContext {
    name: String,
    context: Context,
}

#[derive(Debug, Serialize, Deserialize)]
struct NamedExtension {
    name: String,
    extension: Value,
}

/// kubectl writes `clusters: null` for empty lists.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Document {
    /// Reject documents that declare a different kind or version.
    pub(crate) fn validate(&self) -> Result<(), KubeconfigError> {
        if let Some(kind) = self.kind.as_deref() {
            if !kind.is_empty() && kind != KIND {
                return Err(KubeconfigError::NotAKubeconfig(format!(
                    "kind is '{}', expected '{}'",
                    kind, KIND
                )));
            }
        }
        if let Some(version) = self.api_version.as_deref() {
            if !version.is_empty() && version != API_VERSION {
                return Err(KubeconfigError::NotAKubeconfig(format!(
                    "apiVersion is '{}', expected '{}'",
                    version, API_VERSION
                )));
            }
        }
        Ok(())
    }

    /// Convert to the keyed form. A name listed twice keeps its first entry.
    pub(crate) fn into_config(self, origin: Option<&Path>) -> Kubeconfig {
        let mut config = Kubeconfig {
            preferences: self.preferences,
            current_context: self.current_context,
            ..Kubeconfig::default()
        };

        for NamedCluster { name, mut cluster } in self.clusters {
            cluster.location_of_origin = origin.map(Path::to_path_buf);
            config.clusters.entry(name).or_insert(cluster);
        }
        for NamedAuthInfo { name, mut user } in self.users {
            user.location_of_origin = origin.map(Path::to_path_buf);
            config.auth_infos.entry(name).or_insert(user);
        }
        for NamedContext { name, mut context } in self.contexts {
            context.location_of_origin = origin.map(Path::to_path_buf);
            config.contexts.entry(name).or_insert(context);
        }
        for NamedExtension { name, extension } in self.extensions {
            config.extensions.entry(name).or_insert(extension);
        }

        config
    }

    pub(crate) fn from_config(config: &Kubeconfig) -> Self {
        Self {
            api_version: Some(API_VERSION.to_string()),
            kind: Some(KIND.to_string()),
            preferences: config.preferences.clone(),
            current_context: config.current_context.clone(),
            clusters: config
                .clusters
                .iter()
                .map(|(name, cluster)| NamedCluster {
                    name: name.clone(),
                    cluster: cluster.clone(),
                })
                .collect(),
            users: config
                .auth_infos
                .iter()
                .map(|(name, user)| NamedAuthInfo {
                    name: name.clone(),
                    user: user.clone(),
                })
                .collect(),
            contexts: config
                .contexts
                .iter()
                .map(|(name, context)| NamedContext {
                    name: name.clone(),
                    context: context.clone(),
                })
                .collect(),
            extensions: config
                .extensions
                .iter()
                .map(|(name, extension)| NamedExtension {
                    name: name.clone(),
                    extension: extension.clone(),
                })
                .collect(),
        }
    }
}
