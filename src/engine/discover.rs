//! Kubeconfig discovery
//!
//! A file is a candidate iff it parses as a kubeconfig. Directories may hold
//! anything (READMEs, certificates, kubectl caches), so a parse failure only
//! means "not a kubeconfig" and is never reported as an error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ks_kubeconfig::Kubeconfig;
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::config::SearchPath;

/// Result of testing one file
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Kubeconfig(Kubeconfig),
    NotAKubeconfig,
}

/// A discovered file together with its parsed contents
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFile {
    pub path: PathBuf,
    pub config: Kubeconfig,
}

/// Discovery errors
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("Error loading config from {root}: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Error checking file {path}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Candidate files in merge order, highest precedence first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrecedenceList {
    candidates: Vec<CandidateFile>,
}

impl PrecedenceList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append at the lowest precedence.
    pub fn push(&mut self, path: PathBuf, config: Kubeconfig) {
        self.candidates.push(CandidateFile { path, config });
    }

    /// Append the master file at the lowest precedence, if it exists and
    /// parses. Returns whether it was added.
    pub fn append_master(&mut self, master: &Path) -> Result<bool, DiscoveryError> {
        match fs::metadata(master) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %master.display(), "no master config yet");
                return Ok(false);
            }
            Err(e) => {
                return Err(DiscoveryError::Stat {
                    path: master.to_path_buf(),
                    source: e,
                })
            }
        }

        match classify(master) {
            Classification::Kubeconfig(config) => {
                self.push(master.to_path_buf(), config);
                Ok(true)
            }
            Classification::NotAKubeconfig => Ok(false),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CandidateFile> {
        self.candidates.iter()
    }

    /// Paths in precedence order
    pub fn paths(&self) -> Vec<&Path> {
        self.candidates.iter().map(|c| c.path.as_path()).collect()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl IntoIterator for PrecedenceList {
    type Item = CandidateFile;
    type IntoIter = std::vec::IntoIter<CandidateFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.into_iter()
    }
}

/// Test whether `path` is a kubeconfig by loading it.
pub fn classify(path: &Path) -> Classification {
    match Kubeconfig::load_from_file(path) {
        Ok(config) => Classification::Kubeconfig(config),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "skipping file that is not a kubeconfig");
            Classification::NotAKubeconfig
        }
    }
}

/// Find every kubeconfig under `search_paths`.
///
/// Results are grouped by search path in the given order; within a
/// directory, entries are visited in file-name order.
pub fn discover(search_paths: &[SearchPath], home: &Path) -> Result<PrecedenceList, DiscoveryError> {
    let mut list = PrecedenceList::new();
    for search_path in search_paths {
        let root = search_path.expand(home);
        walk_root(&root, &mut list)?;
    }
    debug!(candidates = list.len(), "discovery finished");
    Ok(list)
}

fn walk_root(root: &Path, list: &mut PrecedenceList) -> Result<(), DiscoveryError> {
    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
    {
        let entry = entry.map_err(|e| DiscoveryError::Walk {
            root: root.to_path_buf(),
            source: e,
        })?;

        if entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path();
        trace!(path = %path.display(), "visiting");
        if let Classification::Kubeconfig(config) = classify(path) {
            list.push(path.to_path_buf(), config);
        }
    }
    Ok(())
}
