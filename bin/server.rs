// Vehicle Ledger - Web Server
// REST API with Axum over the SQLite ledger

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use vehicle_ledger::api::{router, AppState};
use vehicle_ledger::config::DEFAULT_CONFIG_PATH;
use vehicle_ledger::{load_config, logging, ChaincodeHost, SqliteLedger};

#[derive(Parser)]
#[command(name = "vlm-server", version, about = "HTTP API for the vehicle ledger")]
struct Args {
    /// Path to the TOML config file.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Address to listen on, overrides `server.bind_addr`.
    #[arg(long)]
    bind: Option<String>,
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let args = Args::parse();
    let config = load_config(&args.config)?;
    let addr = args.bind.unwrap_or_else(|| config.server.bind_addr.clone());

    let ledger = SqliteLedger::open(&config.database_path)?;
    info!(database = %config.database_path.display(), "ledger opened");

    let host = ChaincodeHost::new(ledger, config.lifecycle.clone()).with_actor(config.actor.clone());
    let app = router(AppState::new(host));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    println!("🚀 Vehicle ledger API on http://{}", addr);
    println!("   Health: http://{}/api/health", addr);
    println!("   Cars:   http://{}/api/cars", addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .context("Server exited with an error")?;

    Ok(())
}
