//! Semantic validation of loaded key records.
//!
//! Serde covers syntax and key encoding. This pass checks the records make
//! sense together and returns every problem found, not just the first.

use std::collections::HashSet;
use std::fmt;

use crate::blockchain::account::KeyRecord;
use crate::config::schema::Addresses;

/// A single semantic problem in the address records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Node has an empty name.
    EmptyNodeName { index: usize },
    /// Two nodes share a name.
    DuplicateNodeName(String),
    /// Node has a remote account but no transport key to pair it with.
    RemoteWithoutTransport(String),
    /// Stored public key does not match the private key.
    PublicKeyMismatch { node: String, key: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyNodeName { index } => {
                write!(f, "node at position {} has an empty name", index)
            }
            ValidationError::DuplicateNodeName(name) => write!(f, "duplicate node name '{}'", name),
            ValidationError::RemoteWithoutTransport(name) => {
                write!(f, "node '{}' has a remote key but no transport key", name)
            }
            ValidationError::PublicKeyMismatch { node, key } => {
                write!(f, "node '{}' {} public key does not match its private key", node, key)
            }
        }
    }
}

/// Validate address records, collecting all errors.
///
/// Only nodes that will be linked are checked; records without a main
/// account or without linkable keys are ignored by a run.
pub fn validate_addresses(addresses: &Addresses) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (index, node) in addresses.nodes.iter().enumerate() {
        if !node.is_linkable() {
            continue;
        }

        if node.name.trim().is_empty() {
            errors.push(ValidationError::EmptyNodeName { index });
        } else if !seen.insert(node.name.as_str()) {
            errors.push(ValidationError::DuplicateNodeName(node.name.clone()));
        }

        if node.remote.is_some() && node.transport.is_none() {
            errors.push(ValidationError::RemoteWithoutTransport(node.name.clone()));
        }

        let main_consistent = node
            .main
            .as_ref()
            .map_or(true, |pair| pair.private_key.public_key() == pair.public_key);
        let records = [
            ("main", main_consistent),
            ("remote", node.remote.as_ref().map_or(true, KeyRecord::is_consistent)),
            ("vrf", node.vrf.as_ref().map_or(true, KeyRecord::is_consistent)),
            ("transport", node.transport.as_ref().map_or(true, KeyRecord::is_consistent)),
        ];
        for (key, consistent) in records {
            if !consistent {
                errors.push(ValidationError::PublicKeyMismatch {
                    node: node.name.clone(),
                    key,
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
