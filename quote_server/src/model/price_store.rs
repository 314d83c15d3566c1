//! Shared per-symbol price state.
//!
//! Each tracked symbol owns its current price and a rolling window of the most recent
//! [`HISTORY_LIMIT`] recorded prices. The store is created once per process with a
//! random base price for every symbol and lives until shutdown.
//!
//! The store itself is not synchronized; the server shares it as `Arc<Mutex<PriceStore>>`
//! and holds the lock for a single symbol's read-modify-write step.

use std::collections::{HashMap, VecDeque};

use quote_common::{Result, StreamError, SymbolRegistry};
use rand::Rng;

use super::round_cents;

/// Maximum number of prices retained per symbol.
pub const HISTORY_LIMIT: usize = 60;
/// Lower bound of the random base price.
pub const MIN_BASE_PRICE: f64 = 50.0;
/// Upper bound of the random base price.
pub const MAX_BASE_PRICE: f64 = 250.0;

/// Current price and bounded history of one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceState {
    current_price: f64,
    history: VecDeque<f64>,
}

impl PriceState {
    /// Start from `base_price` with an empty history.
    pub fn new(base_price: f64) -> Self {
        Self {
            current_price: base_price,
            history: VecDeque::with_capacity(HISTORY_LIMIT + 1),
        }
    }

    /// Latest known price.
    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    /// Rolling window, oldest first.
    pub fn history(&self) -> &VecDeque<f64> {
        &self.history
    }

    /// Detached copy of the rolling window.
    pub fn history_snapshot(&self) -> Vec<f64> {
        self.history.iter().copied().collect()
    }

    /// Append `price`, evicting the oldest entry past [`HISTORY_LIMIT`], and make it current.
    pub fn record(&mut self, price: f64) {
        self.history.push_back(price);
        while self.history.len() > HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.current_price = price;
    }
}

/// Price state of every registered symbol.
#[derive(Debug, Clone, Default)]
pub struct PriceStore {
    states: HashMap<String, PriceState>,
}

impl PriceStore {
    /// Seed every symbol with a base price drawn from the thread-local RNG.
    pub fn new(registry: &SymbolRegistry) -> Self {
        Self::with_rng(registry, &mut rand::rng())
    }

    /// Seed every symbol with a base price uniform in `[MIN_BASE_PRICE, MAX_BASE_PRICE]`.
    pub fn with_rng<R: Rng + ?Sized>(registry: &SymbolRegistry, rng: &mut R) -> Self {
        let states = registry
            .iter()
            .map(|symbol| {
                let base = round_cents(rng.random_range(MIN_BASE_PRICE..=MAX_BASE_PRICE));
                (symbol.to_string(), PriceState::new(base))
            })
            .collect();
        Self { states }
    }

    /// Build a store from explicit base prices.
    pub fn with_prices<I, S>(prices: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let states = prices
            .into_iter()
            .map(|(symbol, price)| (symbol.into(), PriceState::new(price)))
            .collect();
        Self { states }
    }

    /// State of `symbol`.
    pub fn read(&self, symbol: &str) -> Result<&PriceState> {
        self.states
            .get(symbol)
            .ok_or_else(|| StreamError::SymbolNotFound(symbol.to_string()))
    }

    /// Record a freshly resolved price for `symbol`.
    pub fn record_price(&mut self, symbol: &str, price: f64) -> Result<()> {
        let state = self
            .states
            .get_mut(symbol)
            .ok_or_else(|| StreamError::SymbolNotFound(symbol.to_string()))?;
        state.record(price);
        Ok(())
    }
}
