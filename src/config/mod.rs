//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! target folder (preset.toml, addresses.toml)
//!     → loader.rs (read, decrypt, deserialize)
//!     → validation.rs (semantic checks on key records)
//!     → PresetData + Addresses (immutable for one run)
//! ```
//!
//! # Design Decisions
//! - Records are loaded fresh for every run; nothing is cached
//! - Optional keys are `Option` fields, never empty strings
//! - Validation reports every problem at once

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigError, ConfigLoader, FileConfigLoader, KeyDecryptor};
pub use schema::{Addresses, ClientConfig, LinkParams, NodeAccount, PresetData, VotingKey};
