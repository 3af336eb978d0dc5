mod api;
mod config;
mod exchanges;
mod middleware;
mod opportunity;
mod shared;
mod storage;

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use solana_sdk::pubkey::Pubkey;
use tokio::net::TcpListener;
use tracing::info;

use crate::api::{create_router, AppState};
use crate::exchanges::api_clients::jupiter_quote_client::JupiterQuoteClient;
use crate::opportunity::scanner::PriceScanner;
use crate::storage::Stores;

#[derive(Parser, Debug)]
#[command(version, about = "REST API backing the Solana arbitrage dashboard")]
struct Args {
    /// Path to config file
    #[arg(long, default_value = "Config.toml")]
    config: PathBuf,

    /// Listen port (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Data directory for the document stores (overrides config)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let mut cfg = config::Config::from_file(&args.config)
        .with_context(|| format!("load config from {}", args.config.display()))?;
    if let Some(port) = args.port {
        cfg.server.port = port;
    }
    if let Some(data_dir) = args.data_dir {
        cfg.storage.data_dir = data_dir;
    }

    // Validate admin address
    Pubkey::from_str(&cfg.admin.wallet_address)
        .map_err(|e| anyhow!("invalid Solana admin address {}: {}", cfg.admin.wallet_address, e))?;

    let stores = Stores::open(&cfg.storage.data_dir).context("open document stores")?;

    let client = Arc::new(JupiterQuoteClient::new(&cfg.quotes));
    let scanner = Arc::new(PriceScanner::new(client, cfg.quotes.sources.clone()));

    let cfg = Arc::new(cfg);
    let state = AppState {
        config: cfg.clone(),
        scanner,
        stores: Arc::new(stores),
    };

    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", cfg.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("🎯 API server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
