//! Structured logging.
//!
//! # Design Decisions
//! - Uses the tracing crate for structured events
//! - Log level comes from `RUST_LOG`, falling back to the caller's default
//! - The orchestrator receives its logger as a `Dispatch`, so a run can be
//!   pointed at any subscriber without touching the global one

use tracing::dispatcher::SetGlobalDefaultError;
use tracing::Dispatch;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "node_link=info";

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Install a logger as the global subscriber and return it for injection.
pub fn init(default_filter: &str) -> Result<Dispatch, SetGlobalDefaultError> {
    let dispatch = logger(default_filter);
    tracing::dispatcher::set_global_default(dispatch.clone())?;
    Ok(dispatch)
}

/// Build a standalone logger without installing it globally.
pub fn logger(default_filter: &str) -> Dispatch {
    let subscriber = tracing_subscriber::registry()
        .with(env_filter(default_filter))
        .with(tracing_subscriber::fmt::layer());
    Dispatch::new(subscriber)
}
