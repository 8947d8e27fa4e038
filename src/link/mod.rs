//! Key-link subsystem.
//!
//! # Data Flow
//! ```text
//! LinkParams
//!     → orchestrator.rs (load records, verify network, build, announce)
//!     → blockchain::announce (signing and broadcast)
//! ```
//!
//! # Safety
//! - The generation hash is verified before any transaction is built
//! - Any failure aborts the whole run; partial results are never announced

pub mod orchestrator;
pub mod types;

pub use orchestrator::LinkOrchestrator;
pub use types::{LinkError, LinkResult};
