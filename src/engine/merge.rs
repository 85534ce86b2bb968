//! First-listed-wins merge
//!
//! A name defined in several files keeps the definition from the earliest
//! file, replaced as a whole value. Fields are never combined across files.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::path::Path;

use ks_kubeconfig::Kubeconfig;
use tracing::debug;

use super::discover::PrecedenceList;

/// The merged view of every candidate file
pub type MergedConfig = Kubeconfig;

/// Merge candidates in precedence order.
pub fn merge(list: &PrecedenceList) -> MergedConfig {
    list.iter()
        .fold(MergedConfig::default(), |mut merged, candidate| {
            merge_into(&mut merged, &candidate.config, &candidate.path);
            merged
        })
}

fn merge_into(merged: &mut MergedConfig, source: &Kubeconfig, path: &Path) {
    first_wins(&mut merged.clusters, &source.clusters, "cluster", path);
    first_wins(&mut merged.auth_infos, &source.auth_infos, "user", path);
    first_wins(&mut merged.contexts, &source.contexts, "context", path);
    first_wins(&mut merged.extensions, &source.extensions, "extension", path);

    if merged.current_context.is_empty() && !source.current_context.is_empty() {
        merged.current_context = source.current_context.clone();
    }
    if merged.preferences.is_empty() && !source.preferences.is_empty() {
        merged.preferences = source.preferences.clone();
    }
}

fn first_wins<V: Clone>(
    merged: &mut BTreeMap<String, V>,
    source: &BTreeMap<String, V>,
    kind: &str,
    path: &Path,
) {
    for (name, value) in source {
        match merged.entry(name.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(value.clone());
            }
            Entry::Occupied(_) => {
                debug!(kind, name = %name, path = %path.display(), "shadowed by an earlier file");
            }
        }
    }
}
