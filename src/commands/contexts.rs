//! Context commands: list, current, switch, new, rename, delete.

use std::fmt;

use ks_kubeconfig::{Context, Kubeconfig};
use serde::Serialize;

use super::CommandError;

/// One context as shown by `list` and `current`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextSummary {
    pub name: String,
    pub current: bool,
    pub cluster: String,
    /// False when the cluster reference does not resolve
    pub cluster_found: bool,
    pub user: String,
    pub user_found: bool,
    pub namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ContextSummary {
    fn new(config: &Kubeconfig, name: &str, context: &Context) -> Self {
        Self {
            name: name.to_string(),
            current: name == config.current_context,
            cluster: context.cluster.clone(),
            cluster_found: config.cluster_for(context).is_some(),
            user: context.auth_info.clone(),
            user_found: config.auth_info_for(context).is_some(),
            namespace: context.namespace.clone(),
            location: context
                .location_of_origin
                .as_ref()
                .map(|p| p.display().to_string()),
        }
    }

    pub fn render(&self, verbose: bool) -> String {
        let title = if self.current {
            format!("{} (current)", self.name)
        } else {
            self.name.clone()
        };
        if !verbose {
            return title;
        }

        let cluster = if self.cluster_found {
            self.cluster.clone()
        } else {
            format!("{} (not found)", self.cluster)
        };
        format!(
            "{}\n  Location: {}\n  Cluster: {}\n  Namespace: {}\n",
            title,
            self.location.as_deref().unwrap_or(""),
            cluster,
            self.namespace
        )
    }
}

/// Output of `ks list`: current context first, then the rest by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContextListing {
    pub contexts: Vec<ContextSummary>,
}

impl ContextListing {
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    pub fn render(&self, verbose: bool) -> String {
        if self.contexts.is_empty() {
            return "No contexts found. Please make sure your KSPATH is set correctly.".to_string();
        }
        self.contexts
            .iter()
            .map(|c| c.render(verbose))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

pub fn list_contexts(config: &Kubeconfig) -> ContextListing {
    let mut contexts = Vec::with_capacity(config.contexts.len());
    if let Some((name, context)) = config.current() {
        contexts.push(ContextSummary::new(config, name, context));
    }
    // BTreeMap iteration is already sorted by name
    contexts.extend(
        config
            .contexts
            .iter()
            .filter(|(name, _)| **name != config.current_context)
            .map(|(name, context)| ContextSummary::new(config, name, context)),
    );
    ContextListing { contexts }
}

pub fn current_context(config: &Kubeconfig) -> Option<ContextSummary> {
    config
        .current()
        .map(|(name, context)| ContextSummary::new(config, name, context))
}

/// Result of `ks switch`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Switched {
    pub context: String,
    pub namespace: String,
}

impl fmt::Display for Switched {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"Switched to context "{}" (namespace: "{}")"#,
            self.context, self.namespace
        )
    }
}

/// Make `name` (or the current context) current, optionally changing its
/// namespace.
pub fn switch_context(
    config: &mut Kubeconfig,
    name: Option<&str>,
    namespace: Option<&str>,
) -> Result<Switched, CommandError> {
    let name = name.unwrap_or(config.current_context.as_str()).to_string();
    let context = config
        .contexts
        .get_mut(&name)
        .ok_or_else(|| CommandError::NoSuchContext(name.clone()))?;

    if let Some(ns) = namespace.filter(|ns| !ns.is_empty()) {
        context.namespace = ns.to_string();
    }
    let namespace = context.namespace.clone();
    config.current_context = name.clone();

    Ok(Switched {
        context: name,
        namespace,
    })
}

/// Options for `ks new`
#[derive(Debug, Clone, Default)]
pub struct NewContext {
    pub name: String,
    /// Existing context to copy
    pub from: Option<String>,
    pub cluster: Option<String>,
    pub user: Option<String>,
    pub namespace: Option<String>,
}

/// Result of `ks new`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub context: String,
}

impl fmt::Display for Created {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Created context {}.", self.context)
    }
}

/// Add a context. An existing context with the same name is replaced.
pub fn new_context(config: &mut Kubeconfig, options: NewContext) -> Result<Created, CommandError> {
    let mut context = match options.from.as_deref().filter(|s| !s.is_empty()) {
        Some(from) => config
            .contexts
            .get(from)
            .cloned()
            .ok_or_else(|| CommandError::NoSuchContext(from.to_string()))?,
        None => Context::default(),
    };
    context.location_of_origin = None;

    if let Some(cluster) = options.cluster.filter(|s| !s.is_empty()) {
        if !config.clusters.contains_key(&cluster) {
            return Err(CommandError::NoSuchCluster(cluster));
        }
        context.cluster = cluster;
    }
    if let Some(user) = options.user.filter(|s| !s.is_empty()) {
        if !config.auth_infos.contains_key(&user) {
            return Err(CommandError::NoSuchUser(user));
        }
        context.auth_info = user;
    }
    if let Some(namespace) = options.namespace.filter(|s| !s.is_empty()) {
        context.namespace = namespace;
    }

    config.contexts.insert(options.name.clone(), context);
    Ok(Created {
        context: options.name,
    })
}

/// Result of `ks rename`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renamed {
    pub from: String,
    pub to: String,
}

impl fmt::Display for Renamed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Context {} renamed to {}.", self.from, self.to)
    }
}

/// Rename a context, keeping it current if it was.
pub fn rename_context(config: &mut Kubeconfig, from: &str, to: &str) -> Result<Renamed, CommandError> {
    if !config.contexts.contains_key(from) {
        return Err(CommandError::NoSuchContext(from.to_string()));
    }
    if config.contexts.contains_key(to) {
        return Err(CommandError::ContextExists(to.to_string()));
    }

    if let Some(context) = config.contexts.remove(from) {
        config.contexts.insert(to.to_string(), context);
    }
    if config.current_context == from {
        config.current_context = to.to_string();
    }

    Ok(Renamed {
        from: from.to_string(),
        to: to.to_string(),
    })
}

/// Result of `ks delete`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deleted {
    pub contexts: Vec<String>,
    /// The current context was among those deleted
    pub cleared_current: bool,
}

impl Deleted {
    pub fn warning(&self) -> Option<&'static str> {
        self.cleared_current
            .then_some("Current context was deleted and has been set to empty.")
    }
}

impl fmt::Display for Deleted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deleted contexts {}.", self.contexts.join(", "))
    }
}

/// Remove contexts. Names that do not exist are ignored.
pub fn delete_contexts(config: &mut Kubeconfig, names: &[String]) -> Deleted {
    let mut cleared_current = false;
    for name in names {
        config.contexts.remove(name);
        if config.current_context == *name {
            config.current_context.clear();
            cleared_current = true;
        }
    }
    Deleted {
        contexts: names.to_vec(),
        cleared_current,
    }
}
