//! Shell integration: `ks init`, `ks activate`, `ks deactivate`.
//!
//! The rc file sources `~/.ks/init.sh` when it exists; activation writes
//! that script and deactivation removes it.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::CommandError;
use crate::config::Settings;
use crate::error::KsError;

const MARKER: &str = "# Added by ks init. Do not edit.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShellKind {
    Posix,
    Fish,
}

fn shell_kind(shell: &str) -> Result<(ShellKind, &'static str), CommandError> {
    let base = Path::new(shell)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(shell)
        .trim_start_matches('-');

    match base {
        "bash" => Ok((ShellKind::Posix, ".bashrc")),
        "zsh" => Ok((ShellKind::Posix, ".zshrc")),
        "fish" => Ok((ShellKind::Fish, ".config/fish/config.fish")),
        other => Err(CommandError::UnknownShell(other.to_string())),
    }
}

fn source_snippet(kind: ShellKind, init_script: &Path) -> String {
    let script = init_script.display();
    match kind {
        ShellKind::Posix => format!(
            "{}\n[[ -f \"{}\" ]] && source \"{}\"\n",
            MARKER, script, script
        ),
        ShellKind::Fish => format!(
            "{}\ntest -f \"{}\"; and source \"{}\"\n",
            MARKER, script, script
        ),
    }
}

/// Result of `ks init`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Initialized {
    pub rc_file: PathBuf,
    /// False when the rc file already sourced the init script
    pub appended: bool,
}

impl fmt::Display for Initialized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"Initialized. Use "ks activate" to use kubeconfig generated from KSPATH for new shell sessions."#
        )
    }
}

/// Create the ks directory and hook the init script into the shell rc file.
pub fn init(settings: &Settings, force: bool) -> Result<Initialized, KsError> {
    if !force && settings.is_initialized()? {
        return Err(CommandError::AlreadyInitialized.into());
    }

    let shell = settings.shell.as_deref().unwrap_or_default();
    let (kind, rc) = shell_kind(shell)?;
    let rc_file = settings.home_dir.join(rc);

    fs::create_dir_all(&settings.ks_home).map_err(|e| io_error(&settings.ks_home, e))?;

    let existing = match fs::read_to_string(&rc_file) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(io_error(&rc_file, e).into()),
    };
    if existing.contains(MARKER) {
        debug!(path = %rc_file.display(), "rc file already sources ks");
        return Ok(Initialized {
            rc_file,
            appended: false,
        });
    }

    if let Some(parent) = rc_file.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }
    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(&rc_file)
        .map_err(|e| io_error(&rc_file, e))?;
    write!(file, "\n{}", source_snippet(kind, &settings.init_script_path))
        .map_err(|e| io_error(&rc_file, e))?;

    Ok(Initialized {
        rc_file,
        appended: true,
    })
}

/// Result of `ks activate`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activated {
    pub master_path: PathBuf,
}

impl fmt::Display for Activated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Activated. KUBECONFIG will be set to {} for future shell sessions.",
            self.master_path.display()
        )
    }
}

/// Point future shells at the master config.
pub fn activate(settings: &Settings) -> Result<Activated, CommandError> {
    let script = format!("export KUBECONFIG=\"{}\"\n", settings.master_path.display());
    fs::write(&settings.init_script_path, script)
        .map_err(|e| io_error(&settings.init_script_path, e))?;

    Ok(Activated {
        master_path: settings.master_path.clone(),
    })
}

/// Stop pointing future shells at the master config.
pub fn deactivate(settings: &Settings) -> Result<(), CommandError> {
    match fs::remove_file(&settings.init_script_path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(io_error(&settings.init_script_path, e)),
    }
}

fn io_error(path: &Path, source: io::Error) -> CommandError {
    CommandError::Io {
        path: path.to_path_buf(),
        source,
    }
}
