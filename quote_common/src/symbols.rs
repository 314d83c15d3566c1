//! Ticker symbol registry shared between client and server.
//!
//! The registry is built once at startup and never changes afterwards. Its order is the
//! canonical order of every `prices` batch.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StreamError;

/// Symbols tracked when nothing else is configured.
pub const DEFAULT_SYMBOLS: &str = "AAPL,GOOGL,MSFT,TSLA,NVDA";

/// Ordered, duplicate-free list of tracked ticker symbols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct SymbolRegistry {
    symbols: Vec<String>,
}

impl SymbolRegistry {
    /// Build a registry from any sequence of symbols.
    ///
    /// Entries are trimmed, empty entries are dropped and duplicates keep their first
    /// position. An empty result is rejected.
    pub fn from_symbols<I, S>(symbols: I) -> Result<Self, StreamError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<String> = Vec::new();
        for raw in symbols {
            let symbol = raw.as_ref().trim();
            if symbol.is_empty() || unique.iter().any(|s| s == symbol) {
                continue;
            }
            unique.push(symbol.to_string());
        }
        if unique.is_empty() {
            return Err(StreamError::Config("symbol registry is empty".to_string()));
        }
        Ok(Self { symbols: unique })
    }

    /// Iterate symbols in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }

    /// Number of tracked symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always `false`; construction rejects empty registries.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Whether `symbol` is tracked.
    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    /// Symbols as a slice, in registry order.
    pub fn as_slice(&self) -> &[String] {
        &self.symbols
    }
}

impl Default for SymbolRegistry {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.split(',').map(str::to_string).collect(),
        }
    }
}

/// Deserialized lists go through the same cleanup as [`SymbolRegistry::from_symbols`].
impl TryFrom<Vec<String>> for SymbolRegistry {
    type Error = StreamError;

    fn try_from(symbols: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_symbols(symbols)
    }
}

impl From<SymbolRegistry> for Vec<String> {
    fn from(registry: SymbolRegistry) -> Self {
        registry.symbols
    }
}

/// Parses a comma-separated list such as `"AAPL, MSFT,TSLA"`.
impl FromStr for SymbolRegistry {
    type Err = StreamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_symbols(s.split(','))
    }
}
