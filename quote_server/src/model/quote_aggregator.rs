//! Batch quote resolution shared by every connection.
//!
//! `QuoteAggregator::get_batch` walks the symbol registry in order and resolves one
//! [`QuoteResult`] per symbol:
//! - with a live provider configured, the provider is asked first; its price is recorded
//!   in the shared [`PriceStore`] and `change` is taken against the price held before;
//! - without a provider, or when the provider fails, the symbol takes one random-walk
//!   step instead.
//!
//! Design notes:
//! - The store lock is held for one symbol at a time and never across the provider call,
//!   so a slow provider only delays the batch being built, not other sessions.
//! - Provider failures are logged and absorbed here. The only errors that escape are
//!   internal ones (poisoned lock, symbol missing from the store), which the caller
//!   treats as a skipped tick.

use std::sync::{Arc, Mutex};

use log::{debug, warn};
use quote_common::{QuoteResult, Result, SymbolRegistry};
use rand::rngs::StdRng;

use super::live_quote::{LiveQuote, QuoteProvider};
use super::price_store::PriceStore;
use super::random_walk;
use super::round_cents;

/// Resolves ordered quote batches for the registry.
pub struct QuoteAggregator {
    registry: SymbolRegistry,
    store: Arc<Mutex<PriceStore>>,
    provider: Option<Box<dyn QuoteProvider>>,
    rng: Mutex<StdRng>,
}

impl QuoteAggregator {
    /// Create an aggregator over `store`.
    ///
    /// `provider` enables live quotes; `None` means every quote is simulated. `rng`
    /// drives the random walk.
    pub fn new(
        registry: SymbolRegistry,
        store: Arc<Mutex<PriceStore>>,
        provider: Option<Box<dyn QuoteProvider>>,
        rng: StdRng,
    ) -> Self {
        Self {
            registry,
            store,
            provider,
            rng: Mutex::new(rng),
        }
    }

    /// Tracked symbols in batch order.
    pub fn registry(&self) -> &SymbolRegistry {
        &self.registry
    }

    /// Shared price state.
    pub fn store(&self) -> &Arc<Mutex<PriceStore>> {
        &self.store
    }

    /// Whether quotes are fetched from a live provider before falling back.
    pub fn live_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Resolve one quote per registered symbol, in registry order.
    pub fn get_batch(&self) -> Result<Vec<QuoteResult>> {
        let mut batch = Vec::with_capacity(self.registry.len());
        for symbol in self.registry.iter() {
            batch.push(self.resolve(symbol)?);
        }
        debug!("Resolved batch of {} quotes", batch.len());
        Ok(batch)
    }

    fn resolve(&self, symbol: &str) -> Result<QuoteResult> {
        if let Some(provider) = &self.provider {
            match provider.fetch_quote(symbol) {
                Ok(live) => return self.record_live(symbol, &live),
                Err(e) => warn!("Live quote for {} failed, simulating instead: {}", symbol, e),
            }
        }
        self.simulate(symbol)
    }

    fn record_live(&self, symbol: &str, live: &LiveQuote) -> Result<QuoteResult> {
        let mut store = self.store.lock()?;
        let previous = store.read(symbol)?.current_price();
        store.record_price(symbol, live.price)?;
        Ok(QuoteResult {
            symbol: symbol.to_string(),
            price: live.price,
            change: round_cents(live.price - previous),
            history: store.read(symbol)?.history_snapshot(),
        })
    }

    fn simulate(&self, symbol: &str) -> Result<QuoteResult> {
        let mut rng = self.rng.lock()?;
        let mut store = self.store.lock()?;
        let step = random_walk::simulate(&mut store, symbol, &mut *rng)?;
        Ok(QuoteResult {
            symbol: symbol.to_string(),
            price: step.price,
            change: step.change,
            history: store.read(symbol)?.history_snapshot(),
        })
    }
}
