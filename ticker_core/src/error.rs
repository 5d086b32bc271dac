//! Error types shared by the bar, the feed worker and the price sources.
//!
//! `TickerError` covers file and JSON failures around the two config files,
//! invalid symbols coming from the watchlist editor, price-source failures and
//! channel plumbing between the feed worker and the UI thread. None of these
//! are fatal to a running bar: callers degrade to a placeholder or a default.
use std::io;

use thiserror::Error;

/// Workspace-wide `Result` alias with `TickerError` as the default error.
pub type Result<T, E = TickerError> = std::result::Result<T, E>;

/// Unified error type for the ticker workspace.
#[derive(Error, Debug)]
pub enum TickerError {
    /// I/O error while reading or writing the watchlist/settings files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A string that cannot be used as a ticker symbol.
    #[error("Invalid ticker symbol: {0:?}")]
    InvalidSymbol(String),

    /// The price source could not deliver data (transport, status or decode failure).
    #[error("Price fetch failed: {0}")]
    Fetch(String),

    /// The price source answered, but a required field was absent.
    #[error("Missing data in response: {0}")]
    MissingData(String),

    /// No usable per-user data directory could be created.
    #[error("Data directory unavailable: {0}")]
    DataDir(String),

    /// Channel send failed (e.g., receiver dropped); contains a short context string.
    #[error("Channel send failed: {0}")]
    ChannelSend(String),

    /// Channel receive failed (e.g., sender closed); contains a short context string.
    #[error("Channel receive failed: {0}")]
    ChannelRecv(String),

    /// The window backend failed to start or run.
    #[error("UI error: {0}")]
    Ui(String),
}
