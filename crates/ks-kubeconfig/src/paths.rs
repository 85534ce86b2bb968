//! Relative file references inside a kubeconfig.
//!
//! Certificate and token paths are relative to the file that declares them.
//! Once a definition is copied into another file they must be absolute.

use std::path::{Path, PathBuf};

use serde_yaml::Value;

use crate::model::Kubeconfig;

/// Absolute directory containing `file`.
pub(crate) fn base_dir(file: &Path) -> PathBuf {
    let dir = file.parent().unwrap_or_else(|| Path::new(""));
    if dir.is_absolute() {
        return dir.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(dir),
        Err(_) => dir.to_path_buf(),
    }
}

fn resolve(value: &mut Option<String>, base: &Path) {
    if let Some(path) = value {
        if !path.is_empty() && Path::new(path.as_str()).is_relative() {
            *path = base.join(path.as_str()).to_string_lossy().into_owned();
        }
    }
}

pub(crate) fn resolve_local_paths(config: &mut Kubeconfig, base: &Path) {
    for cluster in config.clusters.values_mut() {
        resolve(&mut cluster.certificate_authority, base);
    }
    for user in config.auth_infos.values_mut() {
        resolve(&mut user.client_certificate, base);
        resolve(&mut user.client_key, base);
        resolve(&mut user.token_file, base);
        if let Some(exec) = user.extra.get_mut("exec") {
            resolve_exec_command(exec, base);
        }
    }
}

/// A bare command name is looked up on PATH; only `dir/cmd` forms are
/// relative to the file.
fn resolve_exec_command(exec: &mut Value, base: &Path) {
    let Some(Value::String(command)) = exec.get_mut("command") else {
        return;
    };
    if command.contains('/') && Path::new(command.as_str()).is_relative() {
        *command = base.join(command.as_str()).to_string_lossy().into_owned();
    }
}
