//! The watchlist: ordered, duplicate-free symbols stored as a JSON array.
//!
//! File format: `["AAPL", "MSFT"]`. Loading is validated and fails closed:
//! a missing file, malformed JSON, a non-array document or an invalid symbol
//! all yield `DEFAULT_WATCHLIST`. Duplicates are rejected when editing
//! (`Watchlist::add`); a file that already contains some is read as-is.
use std::fs;
use std::path::Path;

use log::{debug, warn};

use crate::error::{Result, TickerError};
use crate::symbol::Symbol;

/// Symbols shown when no usable watchlist file exists.
pub const DEFAULT_WATCHLIST: [&str; 2] = ["AAPL", "MSFT"];

/// Why a symbol could not be added.
#[derive(Debug, PartialEq, Eq)]
pub enum AddRejection {
    /// The input is not a valid symbol.
    Invalid(String),
    /// The symbol is already in the list.
    Duplicate(Symbol),
}

/// Ordered list of symbols; order is display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Watchlist {
    symbols: Vec<Symbol>,
}

impl Watchlist {
    /// Read and validate a watchlist file.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let symbols: Vec<Symbol> = serde_json::from_slice(&bytes)?;
        Ok(Self { symbols })
    }

    /// Read a watchlist file, substituting the default on any failure.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(list) => {
                debug!("Loaded {} symbols from {}", list.len(), path.display());
                list
            }
            Err(TickerError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No watchlist at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                warn!("Unusable watchlist {}: {}. Using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write the list as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(&self.symbols)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Parse `raw` and append it, rejecting invalid and duplicate symbols.
    pub fn add(&mut self, raw: &str) -> Result<Symbol, AddRejection> {
        let symbol = Symbol::parse(raw).map_err(|_| AddRejection::Invalid(raw.trim().to_string()))?;
        if self.contains(&symbol) {
            return Err(AddRejection::Duplicate(symbol));
        }
        self.symbols.push(symbol.clone());
        Ok(symbol)
    }

    /// Remove the symbol at `index`, if any.
    pub fn remove(&mut self, index: usize) -> Option<Symbol> {
        (index < self.symbols.len()).then(|| self.symbols.remove(index))
    }

    /// Whether `symbol` is listed.
    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.symbols.contains(symbol)
    }

    /// Listed symbols in display order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Take the symbols out.
    pub fn into_symbols(self) -> Vec<Symbol> {
        self.symbols
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Default for Watchlist {
    fn default() -> Self {
        let symbols = DEFAULT_WATCHLIST
            .iter()
            .filter_map(|s| Symbol::parse(s).ok())
            .collect();
        Self { symbols }
    }
}
