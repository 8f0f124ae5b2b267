//! Storefront mock section API
//!
//! Serves the homepage section routes from memory so the admin editor and the
//! storefront can run without the production backend.
//!
//! Usage:
//!   storefront-mock --port 3001
//!   storefront-mock --seed sections.json --verbose

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use storefront_mock::{MockState, SECTIONS_PATH, build_router, default_sections, load_seed};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "storefront-mock")]
#[command(about = "In-memory homepage section API")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "3001")]
    port: u16,

    /// JSON file holding an array of sections to start with
    #[arg(short, long)]
    seed: Option<PathBuf>,

    /// Start empty instead of with the default homepage
    #[arg(long, conflicts_with = "seed")]
    no_defaults: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    let sections = match (&args.seed, args.no_defaults) {
        (Some(path), _) => load_seed(path)
            .with_context(|| format!("failed to load seed file {}", path.display()))?,
        (None, true) => Vec::new(),
        (None, false) => default_sections().context("built-in sections are invalid")?,
    };
    info!("Starting with {} sections", sections.len());

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", args.host, args.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    let app = build_router(Arc::new(MockState::new(sections)));
    info!("Section API listening on http://{}{}", addr, SECTIONS_PATH);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            // An error here means no signal handler; run until killed.
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        })
        .await
        .context("HTTP server failed")?;

    info!("Section API stopped");
    Ok(())
}
