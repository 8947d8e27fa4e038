//! Observability subsystem.
//!
//! Every subsystem emits `tracing` events; `logging.rs` decides where they go.

pub mod logging;
