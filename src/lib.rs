//! Key-link transaction orchestration for network nodes.
//!
//! Loads node key records, checks the target network, builds the
//! account/node/VRF/voting key-link transactions of every node and hands
//! them to an announcer.

pub mod blockchain;
pub mod config;
pub mod link;
pub mod observability;

pub use config::schema::LinkParams;
pub use link::{LinkError, LinkOrchestrator, LinkResult};
