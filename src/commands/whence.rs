//! `ks whence`: which files define which contexts.

use std::path::Path;

use serde::Serialize;

use crate::engine::PrecedenceList;

/// One kubeconfig file and the contexts it defines
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WhenceEntry {
    pub path: String,
    /// This file is the one KUBECONFIG points at
    pub current: bool,
    pub contexts: Vec<String>,
}

/// Files in precedence order, optionally filtered to one context
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WhenceReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub files: Vec<WhenceEntry>,
}

impl WhenceReport {
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        for file in &self.files {
            if file.current {
                lines.push(format!("{} (current)", file.path));
            } else {
                lines.push(file.path.clone());
            }
            if self.context.is_none() {
                lines.extend(file.contexts.iter().map(|name| format!("  {}", name)));
            }
        }
        lines.join("\n")
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Report the files in `list`. With `context`, only files defining it.
pub fn whence(list: &PrecedenceList, context: Option<&str>, active: Option<&Path>) -> WhenceReport {
    let files = list
        .iter()
        .filter(|candidate| context.map_or(true, |name| candidate.config.contexts.contains_key(name)))
        .map(|candidate| WhenceEntry {
            path: candidate.path.display().to_string(),
            current: active == Some(candidate.path.as_path()),
            contexts: candidate.config.contexts.keys().cloned().collect(),
        })
        .collect();

    WhenceReport {
        context: context.map(str::to_string),
        files,
    }
}
