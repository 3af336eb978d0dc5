use std::sync::Arc;
use tracing::warn;

use crate::exchanges::api_clients::QuoteApiClient;
use super::detector::PriceQuote;

/// Polls every configured liquidity source for a fresh quote.
pub struct PriceScanner {
    client: Arc<dyn QuoteApiClient>,
    sources: Vec<String>,
}

impl PriceScanner {
    pub fn new(client: Arc<dyn QuoteApiClient>, sources: Vec<String>) -> Self {
        Self { client, sources }
    }

    /// Fetch a quote per source, in configuration order, keyed by the
    /// lowercased source label. A failing source degrades to a `0.0` price
    /// instead of failing the scan, so the result always covers every
    /// configured source.
    pub async fn scan(&self) -> Vec<PriceQuote> {
        let mut quotes = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            let price = match self.client.fetch_price(source).await {
                Ok(price) => price,
                Err(e) => {
                    warn!("⚠️ Error fetching price for {}: {}", source, e);
                    0.0
                }
            };
            quotes.push(PriceQuote {
                source: source.to_lowercase(),
                price,
            });
        }
        quotes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct StubQuoteClient {
        prices: HashMap<String, f64>,
    }

    #[async_trait]
    impl QuoteApiClient for StubQuoteClient {
        async fn fetch_price(&self, source: &str) -> Result<f64> {
            self.prices
                .get(source)
                .copied()
                .ok_or_else(|| anyhow!("source unavailable: {}", source))
        }
    }

    fn scanner(prices: &[(&str, f64)], sources: &[&str]) -> PriceScanner {
        let client = StubQuoteClient {
            prices: prices
                .iter()
                .map(|(s, p)| (s.to_string(), *p))
                .collect(),
        };
        PriceScanner::new(
            Arc::new(client),
            sources.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[tokio::test]
    async fn test_scan_lowercases_source_labels() {
        let scanner = scanner(&[("Orca", 100.0), ("Raydium", 115.0)], &["Orca", "Raydium"]);
        let quotes = scanner.scan().await;

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].source, "orca");
        assert_eq!(quotes[0].price, 100.0);
        assert_eq!(quotes[1].source, "raydium");
        assert_eq!(quotes[1].price, 115.0);
    }

    #[tokio::test]
    async fn test_failed_source_degrades_to_zero() {
        let scanner = scanner(&[("Orca", 100.0)], &["Orca", "Raydium"]);
        let quotes = scanner.scan().await;

        // The scan still covers every configured source
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[1].source, "raydium");
        assert_eq!(quotes[1].price, 0.0);
    }

    #[tokio::test]
    async fn test_all_sources_failing_yields_all_zeros() {
        let scanner = scanner(&[], &["Orca", "Raydium"]);
        let quotes = scanner.scan().await;

        assert_eq!(quotes.len(), 2);
        assert!(quotes.iter().all(|q| q.price == 0.0));
    }
}
