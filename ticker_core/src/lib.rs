//!
//! Core types and engines shared by the ticker bar and its price sources.
//!
//! This crate aggregates:
//! - `error` — unified error type `TickerError` and the `Result` alias.
//! - `symbol` — validated ticker symbols.
//! - `watchlist` — the ordered watchlist and its JSON file.
//! - `settings` — bar size settings and their JSON file.
//! - `paths` — per-user data directory resolution.
//! - `quote` — display categories and per-symbol quote snapshots.
//! - `feed` — turns a watchlist plus a price source into display items.
//! - `marquee` — the scrolling layout engine.
//! - `schedule` — explicit, cancellable fixed-interval timers.
#![warn(missing_docs)]
pub mod error;
pub mod feed;
pub mod marquee;
pub mod paths;
pub mod quote;
pub mod schedule;
pub mod settings;
pub mod symbol;
pub mod watchlist;

pub use error::{Result, TickerError};
pub use feed::{FeedItem, PriceBatch, PriceSource, QuoteFeed};
pub use marquee::{ScrollingMarquee, TextMeasure};
pub use quote::{Category, QuoteSnapshot};
pub use symbol::Symbol;
