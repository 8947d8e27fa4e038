//! node-link
//!
//! Links (or unlinks) the remote, transport, VRF and voting keys of the
//! nodes in a target folder to their main accounts.
//!
//! ```text
//! target/preset.toml, target/addresses.toml
//!     → LinkOrchestrator
//!     → node REST gateway (--url): currency, generation hash, epoch
//!     → announcer
//! ```

use clap::Parser;

use node_link::blockchain::{DryRunAnnouncer, HttpConnector};
use node_link::config::{ClientConfig, FileConfigLoader, LinkParams};
use node_link::observability::logging;
use node_link::LinkOrchestrator;

/// Environment variable holding the key password.
const PASSWORD_ENV_VAR: &str = "NODE_LINK_PASSWORD";

#[derive(Parser)]
#[command(name = "node-link")]
#[command(about = "Announce key-link transactions for configured nodes", long_about = None)]
struct Cli {
    /// Root folder of the node configuration.
    #[arg(short, long, default_value = "target")]
    target: String,

    /// REST url of a node in the target network.
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    /// Maximum fee per transaction, in currency base units.
    #[arg(long, default_value_t = 100_000)]
    max_fee: u64,

    /// Unlink the keys instead of linking them.
    #[arg(long)]
    unlink: bool,

    /// Password of encrypted key material (defaults to $NODE_LINK_PASSWORD).
    #[arg(long)]
    password: Option<String>,

    /// Timeout for each REST request, in seconds.
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logger = logging::init(logging::DEFAULT_FILTER)?;

    let cli = Cli::parse();
    let password = cli.password.or_else(|| std::env::var(PASSWORD_ENV_VAR).ok());

    let params = LinkParams {
        target: cli.target,
        password,
        url: cli.url,
        max_fee: cli.max_fee,
        unlink: cli.unlink,
    };

    tracing::info!(
        target_folder = %params.target,
        url = %params.url,
        max_fee = params.max_fee,
        unlink = params.unlink,
        "node-link v0.1.0 starting"
    );

    let connector = HttpConnector::new(ClientConfig {
        timeout_secs: cli.timeout_secs,
    });
    let orchestrator =
        LinkOrchestrator::new(params, FileConfigLoader::new(), connector, DryRunAnnouncer).with_logger(logger);

    if let Err(e) = orchestrator.run(None, None).await {
        tracing::error!(error = %e, "Link failed");
        return Err(e.into());
    }

    tracing::info!("Link complete");
    Ok(())
}
