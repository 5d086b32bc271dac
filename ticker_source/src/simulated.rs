//! Offline random-walk price source.
//!
//! `SimulatedSource` keeps one running price per symbol. Every `fetch_last`
//! moves each requested price by a uniform step in `[-1%, +1%]` (floored at a
//! small positive value) and returns a short series ending with the new price.
//! The previous close of a symbol is the price it started from, so the bar
//! shows both up and down moves without any network access.
//!
//! Design notes:
//! - Starting prices are drawn once per symbol from `START_PRICE_RANGE`.
//! - `with_failure_rate` makes a fraction of symbols come back without data,
//!   which is handy for seeing the "N/A" rendering.
use std::collections::HashMap;
use std::ops::Range;

use log::debug;
use rand::Rng;
use ticker_core::error::Result;
use ticker_core::feed::{PriceBatch, PriceSource};
use ticker_core::symbol::Symbol;

/// Range starting prices are drawn from.
const START_PRICE_RANGE: Range<f64> = 20.0..500.0;
/// Lowest price the walk can reach.
const MIN_PRICE: f64 = 0.01;

#[derive(Debug, Clone, Copy)]
struct Walk {
    previous_close: f64,
    price: f64,
}

/// Random-walk price source.
#[derive(Debug, Default)]
pub struct SimulatedSource {
    walks: HashMap<Symbol, Walk>,
    failure_rate: f64,
}

impl SimulatedSource {
    /// Create a source with no failures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop each symbol's series with probability `rate` (clamped to `[0, 1]`).
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.failure_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Calculate the next price using a small random walk around `current_price`.
    pub fn next_price(current_price: f64) -> f64 {
        let mut rng = rand::rng();
        let change: f64 = rng.random_range(-0.01..0.01);
        (current_price * (1.0 + change)).max(MIN_PRICE)
    }

    fn walk(&mut self, symbol: &Symbol) -> &mut Walk {
        self.walks.entry(symbol.clone()).or_insert_with(|| {
            let start = rand::rng().random_range(START_PRICE_RANGE);
            Walk {
                previous_close: start,
                price: start,
            }
        })
    }
}

impl PriceSource for SimulatedSource {
    fn fetch_last(&mut self, symbols: &[Symbol]) -> Result<PriceBatch> {
        let failure_rate = self.failure_rate;
        let mut batch = PriceBatch::new();
        for symbol in symbols {
            let walk = self.walk(symbol);
            let before = walk.price;
            walk.price = Self::next_price(before);
            if failure_rate > 0.0 && rand::rng().random_bool(failure_rate) {
                debug!("Simulated outage for {}", symbol);
                continue;
            }
            batch.insert(symbol.clone(), vec![Some(before), None, Some(walk.price)]);
        }
        Ok(batch)
    }

    fn fetch_previous_close(&mut self, symbol: &Symbol) -> Result<Option<f64>> {
        Ok(Some(self.walk(symbol).previous_close))
    }
}
