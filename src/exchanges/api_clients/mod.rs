pub mod jupiter_quote_client;

use async_trait::async_trait;
use anyhow::Result;

/// Base trait for swap-quote API clients
#[async_trait]
pub trait QuoteApiClient: Send + Sync {
    /// Quoted output amount, in display units, for the configured notional
    /// input routed through a single liquidity source.
    async fn fetch_price(&self, source: &str) -> Result<f64>;
}
