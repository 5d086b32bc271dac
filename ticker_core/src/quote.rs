//! Quote snapshots and their display category.
//!
//! A `QuoteSnapshot` combines a freshly fetched last price with the cached
//! previous close for one symbol. It is derived data: rebuilt on every refresh
//! cycle and never persisted.
use strum_macros::{Display, EnumString};

use crate::symbol::Symbol;

/// Trailing separator appended to every display text so consecutive marquee
/// segments are visibly spaced.
pub const SEGMENT_PADDING: &str = "   ";

/// Color category of one display item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Category {
    /// Last price at or above the previous close.
    Up,
    /// Last price below the previous close.
    Down,
    /// Last price known, no baseline to compare against.
    Neutral,
    /// No usable price.
    Error,
}

/// Last price and previous close for one symbol, with the derived category.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteSnapshot {
    /// Symbol the prices belong to.
    pub symbol: Symbol,
    /// Last traded price, if one could be read.
    pub last_price: Option<f64>,
    /// Previous session close, if cached and usable as a baseline.
    pub previous_close: Option<f64>,
    status: Category,
}

impl QuoteSnapshot {
    /// Build a snapshot and derive its category.
    ///
    /// A non-finite last price is treated as absent. A previous close that is
    /// zero, negative or non-finite is dropped: it cannot serve as a baseline.
    pub fn new(symbol: Symbol, last_price: Option<f64>, previous_close: Option<f64>) -> Self {
        let last_price = last_price.filter(|p| p.is_finite());
        let previous_close = previous_close.filter(|p| p.is_finite() && *p > 0.0);
        let status = match (last_price, previous_close) {
            (None, _) => Category::Error,
            (Some(_), None) => Category::Neutral,
            (Some(last), Some(prev)) if last >= prev => Category::Up,
            (Some(_), Some(_)) => Category::Down,
        };
        Self {
            symbol,
            last_price,
            previous_close,
            status,
        }
    }

    /// Derived category.
    pub fn status(&self) -> Category {
        self.status
    }

    /// Percent change against the previous close, when both prices are known.
    pub fn change_percent(&self) -> Option<f64> {
        match (self.last_price, self.previous_close) {
            (Some(last), Some(prev)) => Some((last - prev) / prev * 100.0),
            _ => None,
        }
    }

    /// Marquee text for this snapshot, including the trailing separator.
    ///
    /// - `AAPL: $101.00 (+1.00%)` when both prices are known,
    /// - `XOM: $50.00` without a baseline,
    /// - `ZZZZ: N/A` without a last price.
    pub fn display_text(&self) -> String {
        match (self.last_price, self.change_percent()) {
            (Some(last), Some(change)) => {
                let sign = if change >= 0.0 { '+' } else { '-' };
                format!(
                    "{}: ${:.2} ({}{:.2}%){}",
                    self.symbol,
                    last,
                    sign,
                    change.abs(),
                    SEGMENT_PADDING
                )
            }
            (Some(last), None) => format!("{}: ${:.2}{}", self.symbol, last, SEGMENT_PADDING),
            (None, _) => format!("{}: N/A{}", self.symbol, SEGMENT_PADDING),
        }
    }
}
