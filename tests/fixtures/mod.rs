//! Test fixtures: a throwaway home directory with kubeconfig files.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use ks::Settings;
use tempfile::TempDir;

/// A temporary $HOME
pub struct Home {
    dir: TempDir,
}

impl Home {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp home"),
        }
    }

    /// A home where `ks init` has already run
    pub fn initialized() -> Self {
        let home = Self::new();
        fs::create_dir_all(home.path().join(".ks")).expect("create .ks");
        home
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn master(&self) -> PathBuf {
        self.path().join(".ks/config")
    }

    /// Write `content` at `rel` under the home directory
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&path, content).expect("write fixture");
        path
    }

    pub fn settings(&self, kspath: &str, prior: Option<&Path>) -> Settings {
        Settings::new(
            self.path().to_path_buf(),
            Some(kspath),
            prior.map(Path::to_path_buf),
        )
    }
}

/// A kubeconfig defining one cluster, one user and one context per entry.
///
/// Each entry is `(context, cluster, namespace)`; the user is named after
/// the cluster.
pub fn kubeconfig(contexts: &[(&str, &str, &str)], current: Option<&str>) -> String {
    let mut clusters = String::new();
    let mut users = String::new();
    let mut ctxs = String::new();

    for (name, cluster, namespace) in contexts {
        clusters.push_str(&format!(
            "- name: {cluster}\n  cluster:\n    server: https://{cluster}.example.com\n"
        ));
        users.push_str(&format!("- name: {cluster}\n  user:\n    token: {cluster}-token\n"));
        ctxs.push_str(&format!(
            "- name: {name}\n  context:\n    cluster: {cluster}\n    user: {cluster}\n"
        ));
        if !namespace.is_empty() {
            ctxs.push_str(&format!("    namespace: {namespace}\n"));
        }
    }

    let mut doc = String::from("apiVersion: v1\nkind: Config\n");
    doc.push_str(&format!("clusters:\n{clusters}"));
    doc.push_str(&format!("users:\n{users}"));
    doc.push_str(&format!("contexts:\n{ctxs}"));
    if let Some(current) = current {
        doc.push_str(&format!("current-context: {current}\n"));
    }
    doc
}
