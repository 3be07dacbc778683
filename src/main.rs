use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use clap::Parser;
use rand::Rng;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use multiserve::{AppState, Config, routes};

#[derive(Parser, Debug)]
#[command(name = "multiserve")]
#[command(about = "HTTP server for files spanning multiple directories")]
#[command(version)]
struct Cli {
    /// Directories to serve, highest priority first (default: current directory)
    roots: Vec<PathBuf>,

    /// Port to listen on (default: random ephemeral port)
    #[arg(short, long, env = "MULTISERVE_PORT")]
    port: Option<u16>,

    /// Address to bind to
    #[arg(short, long, env = "MULTISERVE_BIND", default_value = "127.0.0.1")]
    bind: String,

    /// File served when no root matches (single-page app entry point)
    #[arg(short, long, env = "MULTISERVE_FALLBACK")]
    fallback: Option<PathBuf>,

    /// Disable merged directory listings
    #[arg(long, env = "MULTISERVE_NO_LISTING")]
    no_listing: bool,

    /// Enable verbose logging
    #[arg(short, long, env = "MULTISERVE_VERBOSE")]
    verbose: bool,

    /// Config file path (optional)
    #[arg(short, long, env = "MULTISERVE_CONFIG")]
    config: Option<PathBuf>,
}

fn ephemeral_port() -> u16 {
    rand::rng().random_range(49152..=65535)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "multiserve=debug,tower_http=debug"
    } else {
        "multiserve=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config from file if provided, command line values take precedence
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::default()
    };

    if !cli.roots.is_empty() {
        config.roots = cli.roots.clone();
    }
    if cli.fallback.is_some() {
        config.fallback = cli.fallback.clone();
    }
    if cli.no_listing {
        config.listing = false;
    }

    // Resolve roots to absolute paths; unusable roots only contribute nothing
    config.roots = config
        .normalized_roots()
        .into_iter()
        .map(|root| root.canonicalize().unwrap_or(root))
        .collect();

    let state = AppState::new(config);
    let resolver = &state.resolver;

    for (priority, root) in resolver.roots().iter().enumerate() {
        if root.is_dir() {
            info!("Root {}: {}", priority, root.display());
        } else {
            warn!("Root {} is not a directory: {}", priority, root.display());
        }
    }

    if let Some(fallback) = resolver.fallback() {
        if fallback.is_file() {
            info!("Fallback index: {}", fallback.display());
        } else {
            warn!("Fallback index is not a file: {}", fallback.display());
        }
    }

    if !resolver.listing_enabled() {
        info!("Directory listings disabled");
    }

    // Build router
    let app = Router::new()
        .merge(routes::serve_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let port = cli.port.unwrap_or_else(ephemeral_port);
    let addr: SocketAddr = format!("{}:{}", cli.bind, port).parse()?;
    info!("Starting multiserve on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
