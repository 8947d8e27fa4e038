//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Node URL
//!     → client.rs (REST queries with timeouts)
//! Stored key records
//!     → account.rs (key parsing, account derivation)
//!     → transaction.rs (key-link transactions)
//!     → announce.rs (hand-off for signing and broadcast)
//! ```
//!
//! # Security Constraints
//! - Never log private keys
//! - All REST calls have configurable timeouts
//! - Network identity is checked before anything is announced

pub mod account;
pub mod announce;
pub mod client;
pub mod transaction;
pub mod types;

pub use account::{Account, KeyPair, KeyRecord, PrivateKey, PublicKey};
pub use announce::{Announcer, DryRunAnnouncer, NodeTransactions};
pub use client::{HttpConnector, HttpRepository, NetworkRepository, RepositoryConnector};
pub use transaction::{Deadline, LinkAction, Transaction, TransactionKind};
pub use types::{AnnounceError, Currency, KeyError, NetworkType, RepositoryError};
