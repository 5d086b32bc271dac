//! Ticker symbols.
//!
//! A `Symbol` is an opaque uppercase ticker string such as `AAPL`, `BRK-B`,
//! `^GSPC` or `EURUSD=X`. Parsing trims surrounding whitespace and uppercases
//! the input, so `" msft "` and `"MSFT"` name the same instrument.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TickerError;

/// Longest symbol accepted from user input.
const MAX_SYMBOL_LEN: usize = 16;

/// Validated, uppercase ticker symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Parse user or file input into a symbol.
    ///
    /// Returns `TickerError::InvalidSymbol` for empty input, overly long input,
    /// or characters outside `A-Z`, `0-9`, `.`, `-`, `^`, `=`.
    pub fn parse(raw: &str) -> Result<Self, TickerError> {
        let normalized = raw.trim().to_ascii_uppercase();
        if normalized.is_empty() || normalized.len() > MAX_SYMBOL_LEN {
            return Err(TickerError::InvalidSymbol(raw.to_string()));
        }
        let valid = normalized
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='));
        if !valid {
            return Err(TickerError::InvalidSymbol(raw.to_string()));
        }
        Ok(Symbol(normalized))
    }

    /// Borrow the symbol text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Symbol {
    type Err = TickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Symbol::parse(s)
    }
}

impl TryFrom<String> for Symbol {
    type Error = TickerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Symbol::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_uppercases() {
        let symbol = Symbol::parse("  aapl ").unwrap();
        assert_eq!(symbol.as_str(), "AAPL");
    }

    #[test]
    fn parse_accepts_index_and_share_class_symbols() {
        assert!(Symbol::parse("^GSPC").is_ok());
        assert!(Symbol::parse("brk-b").is_ok());
        assert!(Symbol::parse("EURUSD=X").is_ok());
    }

    #[test]
    fn parse_rejects_empty_and_garbage() {
        assert!(matches!(Symbol::parse("   "), Err(TickerError::InvalidSymbol(_))));
        assert!(matches!(Symbol::parse("AA PL"), Err(TickerError::InvalidSymbol(_))));
        assert!(matches!(Symbol::parse("$$$"), Err(TickerError::InvalidSymbol(_))));
    }

    #[test]
    fn deserializes_through_validation() {
        let ok: Symbol = serde_json::from_str("\"msft\"").unwrap();
        assert_eq!(ok.to_string(), "MSFT");
        assert!(serde_json::from_str::<Symbol>("\"\"").is_err());
    }
}
