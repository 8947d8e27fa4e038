//! Link run error definitions.

use thiserror::Error;

use crate::blockchain::types::{AnnounceError, RepositoryError};
use crate::config::loader::ConfigError;

/// Errors that abort a link run.
#[derive(Debug, Error)]
pub enum LinkError {
    /// Preset or address records could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Network query failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Announce collaborator failed.
    #[error(transparent)]
    Announce(#[from] AnnounceError),

    /// Node reports a different network than the preset.
    #[error("You are connecting to the wrong network. Expected generation hash is {expected} but got {actual}")]
    NetworkMismatch { expected: String, actual: String },

    /// Node has no main account to sign with.
    #[error("CA private key is required! (node {node})")]
    MissingMainKey { node: String },

    /// Node has a remote account but no transport key.
    #[error("Transport key is required when a remote key is configured (node {node})")]
    MissingTransportKey { node: String },
}

/// Result type for link runs.
pub type LinkResult<T> = Result<T, LinkError>;
