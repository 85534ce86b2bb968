//! Discovery and merge engine
//!
//! Walks KSPATH for files that parse as kubeconfigs and merges them into a
//! single config. Earlier files win whole keys:
//! - Clusters, users, contexts: first definition of a name wins entirely
//! - current-context: first non-empty value wins
//! - The previous master file, when present, has the lowest precedence

mod discover;
mod merge;

pub use discover::{
    classify, discover, CandidateFile, Classification, DiscoveryError, PrecedenceList,
};
pub use merge::{merge, MergedConfig};
