//!
//! Price sources for the ticker bar and the background worker that polls them.
//!
//! This crate aggregates:
//! - `yahoo` — batched last prices and previous closes from Yahoo Finance over HTTP.
//! - `simulated` — an offline random-walk source for demos and development.
//! - `worker` — the feed thread that owns a `QuoteFeed` and publishes display
//!   items to the UI thread over `crossbeam_channel`.
#![warn(missing_docs)]
pub mod simulated;
pub mod worker;
pub mod yahoo;

pub use simulated::SimulatedSource;
pub use worker::{FeedCommand, FeedEvent, FeedHandle, FeedWorker, QuoteUpdate};
pub use yahoo::YahooSource;
