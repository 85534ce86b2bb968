//! Kubeconfig documents
//!
//! Parses, validates and encodes the `kind: Config` YAML documents that
//! kubectl reads. The in-memory form keys clusters, users and contexts by
//! name; the wire form keeps the list-of-named-entries layout.

pub mod error;
pub mod model;

mod document;
mod paths;

pub use error::KubeconfigError;
pub use model::{AuthInfo, Cluster, Context, Kubeconfig};

/// The only `apiVersion` accepted for kubeconfig documents.
pub const API_VERSION: &str = "v1";

/// The only `kind` accepted for kubeconfig documents.
pub const KIND: &str = "Config";
