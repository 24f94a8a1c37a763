//! kitsuned: the Kitsune daemon.
//!
//! Serves the [`ContentGateway`](kitsune::ContentGateway) over HTTP so
//! every front-end worker shares one cache and one upstream rate window.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use kitsune::server::config::Config;
use kitsune::server::{AppState, router};

/// Kitsune daemon, a caching proxy for the anime content API.
#[derive(Parser)]
#[command(name = "kitsuned")]
#[command(version = kitsune::PKG_VERSION)]
#[command(about = "Kitsune caching proxy daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, env = "KITSUNE_CONFIG")]
    config: Option<std::path::PathBuf>,

    /// Address to bind to (overrides the config file).
    #[arg(short, long)]
    address: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Load configuration
    let config = Config::load(args.config.as_deref())?;
    let address = args.address.unwrap_or_else(|| config.server.address.clone());

    // Parse address
    let addr: SocketAddr = address
        .parse()
        .map_err(|e| kitsune::KitsuneError::Configuration(format!("Invalid address: {e}")))?;

    let gateway = config.builder().build()?;
    let app = router(AppState::new(Arc::new(gateway)));

    info!(
        version = kitsune::version_string(),
        %addr,
        upstream = %config.upstream.base_url,
        "kitsuned starting"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
