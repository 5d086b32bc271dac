//! Per-user data directory for the watchlist and settings files.
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use log::warn;

use crate::error::{Result, TickerError};

/// Application name used for the per-user data directory.
pub const APP_NAME: &str = "StockWatch";
/// Directory used when the platform has no per-user data location.
pub const FALLBACK_DIR: &str = ".stockwatch_data";
/// Watchlist file name inside the data directory.
pub const WATCHLIST_FILE: &str = "tickers.json";
/// Settings file name inside the data directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// Locations of the two JSON files inside a data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFiles {
    /// Watchlist file.
    pub watchlist: PathBuf,
    /// Settings file.
    pub settings: PathBuf,
}

impl DataFiles {
    /// File locations inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            watchlist: dir.join(WATCHLIST_FILE),
            settings: dir.join(SETTINGS_FILE),
        }
    }
}

/// Resolve the data directory without creating it.
///
/// `override_dir` wins when given; otherwise the platform data dir for
/// `APP_NAME`, falling back to `./.stockwatch_data`.
pub fn data_dir(override_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir.to_path_buf();
    }
    match ProjectDirs::from("", "", APP_NAME) {
        Some(dirs) => dirs.data_dir().to_path_buf(),
        None => {
            warn!("No per-user data directory on this platform, using {}", FALLBACK_DIR);
            PathBuf::from(FALLBACK_DIR)
        }
    }
}

/// Resolve and create the data directory.
pub fn ensure_data_dir(override_dir: Option<&Path>) -> Result<PathBuf> {
    let dir = data_dir(override_dir);
    fs::create_dir_all(&dir)
        .map_err(|e| TickerError::DataDir(format!("{}: {}", dir.display(), e)))?;
    Ok(dir)
}
