use serde::Serialize;

/// One liquidity source's quoted output for the fixed notional input.
/// Derived per request, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub source: String,
    pub price: f64,
}

/// A price gap against the baseline source that clears the margin threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub buy_source: String,
    pub buy_price: f64,
    pub sell_source: String,
    pub sell_price: f64,
    pub profit_margin_percent: f64,
}

/// Compare every quoted price against the baseline source and keep the gaps
/// whose margin is at least `threshold_percent`.
///
/// A non-positive baseline price yields no opportunities at all (never divide
/// by it), and sources with non-positive prices are skipped as sell
/// candidates. Margins are compared against the threshold at full precision;
/// only the emitted record is rounded to two decimals.
pub fn find_opportunities(
    quotes: &[PriceQuote],
    baseline: &str,
    threshold_percent: f64,
) -> Vec<Opportunity> {
    let base_price = match quotes.iter().find(|q| q.source == baseline) {
        Some(q) if q.price > 0.0 => q.price,
        _ => return Vec::new(),
    };

    let mut opportunities = Vec::new();
    for quote in quotes {
        if quote.price <= 0.0 {
            continue;
        }
        let margin = (quote.price - base_price) / base_price * 100.0;
        if margin >= threshold_percent {
            opportunities.push(Opportunity {
                buy_source: baseline.to_string(),
                buy_price: base_price,
                sell_source: quote.source.clone(),
                sell_price: quote.price,
                profit_margin_percent: round2(margin),
            });
        }
    }
    opportunities
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
