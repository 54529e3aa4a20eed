//! PoSW Prover Server
//!
//! Runs the WebSocket prover service. Protocol parameters and the bind
//! address come from the environment; everything else uses defaults.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use posw::{ProtocolParams, SessionConfig, VERSION};
use posw::network::server::{ProverServer, ServerConfig};

/// Read an environment variable, falling back to `default` when unset.
fn env_or<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw.parse().with_context(|| format!("invalid {}", key)),
        Err(_) => Ok(default),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let defaults = ProtocolParams::default();
    let tree_height = env_or("POSW_TREE_HEIGHT", defaults.tree_height())?;
    let boundary_depth = env_or("POSW_BOUNDARY_DEPTH", defaults.boundary_depth())?;
    let challenge_count = env_or("POSW_CHALLENGE_COUNT", defaults.challenge_count())?;
    let params = ProtocolParams::new(tree_height, boundary_depth, challenge_count)
        .context("invalid protocol parameters")?;

    let config = ServerConfig {
        bind_addr: env_or("POSW_BIND", "0.0.0.0:8080".parse()?)?,
        connection_timeout: Duration::from_secs(env_or("POSW_IDLE_TIMEOUT_SECS", 300u64)?),
        session: SessionConfig {
            params,
            data_dir: env_or("POSW_DATA_DIR", std::env::temp_dir())?,
            non_interactive: env_or("POSW_NON_INTERACTIVE", false)?,
        },
        ..Default::default()
    };

    info!("PoSW Prover v{}", VERSION);
    info!(
        "Tree height: {}, boundary depth: {}, challenge count: {}",
        params.tree_height(),
        params.boundary_depth(),
        params.challenge_count()
    );
    info!(
        "Mode: {}",
        if config.session.non_interactive { "non-interactive" } else { "interactive" }
    );
    info!("Label stores under {}", config.session.data_dir.display());

    let server = ProverServer::new(config);
    server.run().await.context("prover server failed")?;

    Ok(())
}
