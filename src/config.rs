use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct ServerCfg {
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminCfg {
    pub wallet_address: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuotesCfg {
    pub base_url: String,
    pub input_mint: String,
    pub output_mint: String,
    /// Notional input, in raw base units of the input mint
    pub amount: u64,
    pub output_decimals: u8,
    /// Liquidity source labels as the quote API expects them
    pub sources: Vec<String>,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArbitrageCfg {
    /// Source every other quote is compared against, lowercased
    pub baseline: String,
    pub threshold_percent: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageCfg {
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerCfg,
    pub admin: AdminCfg,
    pub quotes: QuotesCfg,
    pub arbitrage: ArbitrageCfg,
    pub storage: StorageCfg,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path.as_ref())?;
        let cfg: Self = toml::from_str(&s).context("parse Config.toml")?;
        Ok(cfg)
    }
}
