//! Network-specific types and error definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Network a node and its keys belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    /// Public main network.
    MainNet,
    /// Public test network.
    TestNet,
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkType::MainNet => write!(f, "mainnet"),
            NetworkType::TestNet => write!(f, "testnet"),
        }
    }
}

/// Network currency metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Currency {
    /// Currency mosaic id as reported by the node (hex, no separators).
    pub mosaic_id: String,
    /// Number of decimal places of one currency unit.
    pub divisibility: u32,
}

impl Currency {
    /// Express a raw base-unit amount in whole currency units.
    ///
    /// Display only. Fees sent on chain always use the raw amount.
    pub fn relative_amount(&self, amount: u64) -> f64 {
        amount as f64 / 10f64.powi(self.divisibility as i32)
    }
}

/// Errors that can occur while parsing or deriving key material.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// Key is not valid hex.
    #[error("Invalid key hex: {0}")]
    InvalidHex(String),

    /// Key has the wrong number of bytes.
    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Errors that can occur while querying a network node.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Endpoint URL could not be parsed.
    #[error("Invalid network url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Request could not be sent or the connection failed.
    #[error("Request to {path} failed: {reason}")]
    Request { path: String, reason: String },

    /// Node answered with a non-success status.
    #[error("Request to {path} returned status {status}")]
    Status { path: String, status: u16 },

    /// Response body did not have the expected shape.
    #[error("Unexpected response from {path}: {reason}")]
    Decode { path: String, reason: String },

    /// Request timed out.
    #[error("Request to {path} timed out after {secs} seconds")]
    Timeout { path: String, secs: u64 },
}

/// Errors raised by an announce collaborator.
#[derive(Debug, Error)]
pub enum AnnounceError {
    /// Transaction could not be signed.
    #[error("Signing failed for node {node}: {reason}")]
    Signing { node: String, reason: String },

    /// Transaction was rejected or could not be broadcast.
    #[error("Announce failed for node {node}: {reason}")]
    Broadcast { node: String, reason: String },
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_type_display() {
        assert_eq!(NetworkType::MainNet.to_string(), "mainnet");
        assert_eq!(NetworkType::TestNet.to_string(), "testnet");
    }

    #[test]
    fn test_network_type_serde() {
        let parsed: NetworkType = serde_json::from_str("\"mainnet\"").unwrap();
        assert_eq!(parsed, NetworkType::MainNet);
    }

    #[test]
    fn test_relative_amount() {
        let currency = Currency {
            mosaic_id: "6BED913FA20223F8".to_string(),
            divisibility: 6,
        };
        assert_eq!(currency.relative_amount(100_000), 0.1);
        assert_eq!(currency.relative_amount(0), 0.0);
    }

    #[test]
    fn test_error_display() {
        let err = RepositoryError::Timeout {
            path: "/node/info".to_string(),
            secs: 10,
        };
        assert_eq!(err.to_string(), "Request to /node/info timed out after 10 seconds");

        let err = KeyError::InvalidLength {
            expected: 32,
            actual: 31,
        };
        assert!(err.to_string().contains("31"));
    }
}
