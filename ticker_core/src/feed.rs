//! QuoteFeed: watchlist + price source → display items.
//!
//! The feed is a pure transform once raw prices are supplied:
//!
//! - `refresh` calls `PriceSource::fetch_last` once for the whole watchlist and
//!   formats one `FeedItem` per symbol. A failed batch collapses into a single
//!   synthetic error item; a bad series only affects its own symbol.
//! - `refresh_closes` builds the previous-close cache one symbol at a time, so
//!   a failing symbol never aborts the rest.
//! - `QuoteFeed` owns a source, the current watchlist and its close cache. The
//!   cache is rebuilt on `reload` only: previous closes do not move intraday.
use std::collections::HashMap;
use std::time::Duration;

use log::{debug, warn};

use crate::error::Result;
use crate::quote::{Category, QuoteSnapshot, SEGMENT_PADDING};
use crate::symbol::Symbol;

/// Interval between two price refreshes.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Text shown when the batched fetch fails as a whole.
pub const BATCH_ERROR_TEXT: &str = "Error fetching data";

/// Raw intraday price series per symbol, as returned by one batched fetch.
///
/// Series entries are `None` where the source had no value for that bar.
pub type PriceBatch = HashMap<Symbol, Vec<Option<f64>>>;

/// Cached previous-close baseline per symbol.
pub type CloseCache = HashMap<Symbol, Option<f64>>;

/// External collaborator that supplies raw prices.
pub trait PriceSource {
    /// Fetch the recent price series for every symbol in one call.
    ///
    /// An `Err` means the whole batch failed. Symbols the source knows nothing
    /// about may simply be missing from the returned map.
    fn fetch_last(&mut self, symbols: &[Symbol]) -> Result<PriceBatch>;

    /// Fetch the previous session close for one symbol.
    fn fetch_previous_close(&mut self, symbol: &Symbol) -> Result<Option<f64>>;
}

impl<P: PriceSource + ?Sized> PriceSource for Box<P> {
    fn fetch_last(&mut self, symbols: &[Symbol]) -> Result<PriceBatch> {
        (**self).fetch_last(symbols)
    }

    fn fetch_previous_close(&mut self, symbol: &Symbol) -> Result<Option<f64>> {
        (**self).fetch_previous_close(symbol)
    }
}

/// One display-ready marquee entry.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    /// Text including the trailing separator.
    pub text: String,
    /// Color category.
    pub category: Category,
}

impl FeedItem {
    /// Create a new item.
    pub fn new(text: impl Into<String>, category: Category) -> Self {
        Self {
            text: text.into(),
            category,
        }
    }

    /// The single item shown when the batched fetch fails.
    pub fn batch_error() -> Self {
        Self::new(format!("{}{}", BATCH_ERROR_TEXT, SEGMENT_PADDING), Category::Error)
    }
}

impl From<&QuoteSnapshot> for FeedItem {
    fn from(snapshot: &QuoteSnapshot) -> Self {
        Self::new(snapshot.display_text(), snapshot.status())
    }
}

/// Last finite value of a series, skipping gaps.
fn last_valid(series: &[Option<f64>]) -> Option<f64> {
    series.iter().rev().flatten().copied().find(|p| p.is_finite())
}

/// Build snapshots for `symbols` from a batch that was fetched successfully.
pub fn snapshots(symbols: &[Symbol], batch: &PriceBatch, closes: &CloseCache) -> Vec<QuoteSnapshot> {
    symbols
        .iter()
        .map(|symbol| {
            let last = batch.get(symbol).and_then(|series| last_valid(series));
            if last.is_none() {
                debug!("No usable price series for {}", symbol);
            }
            let previous_close = closes.get(symbol).copied().flatten();
            QuoteSnapshot::new(symbol.clone(), last, previous_close)
        })
        .collect()
}

/// Run one refresh cycle over `symbols`.
///
/// An empty watchlist yields an empty result without touching the source.
pub fn refresh<S: PriceSource + ?Sized>(
    symbols: &[Symbol],
    source: &mut S,
    closes: &CloseCache,
) -> Vec<FeedItem> {
    if symbols.is_empty() {
        return Vec::new();
    }
    match source.fetch_last(symbols) {
        Ok(batch) => snapshots(symbols, &batch, closes)
            .iter()
            .map(FeedItem::from)
            .collect(),
        Err(e) => {
            warn!("Batched price fetch failed for {} symbols: {}", symbols.len(), e);
            vec![FeedItem::batch_error()]
        }
    }
}

/// Fetch previous closes for every symbol independently.
pub fn refresh_closes<S: PriceSource + ?Sized>(symbols: &[Symbol], source: &mut S) -> CloseCache {
    symbols
        .iter()
        .map(|symbol| {
            let close = match source.fetch_previous_close(symbol) {
                Ok(close) => close,
                Err(e) => {
                    warn!("Previous close unavailable for {}: {}", symbol, e);
                    None
                }
            };
            (symbol.clone(), close)
        })
        .collect()
}

/// Stateful refresh controller over a price source.
pub struct QuoteFeed<S> {
    source: S,
    symbols: Vec<Symbol>,
    closes: CloseCache,
}

impl<S: PriceSource> QuoteFeed<S> {
    /// Create a feed with an empty watchlist.
    pub fn new(source: S) -> Self {
        Self {
            source,
            symbols: Vec::new(),
            closes: CloseCache::new(),
        }
    }

    /// Replace the watchlist and rebuild the previous-close cache.
    pub fn reload(&mut self, symbols: Vec<Symbol>) {
        self.closes = refresh_closes(&symbols, &mut self.source);
        self.symbols = symbols;
    }

    /// Fetch fresh prices for the current watchlist.
    pub fn refresh(&mut self) -> Vec<FeedItem> {
        refresh(&self.symbols, &mut self.source, &self.closes)
    }

    /// Current watchlist.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }
}
