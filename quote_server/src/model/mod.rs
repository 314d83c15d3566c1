//! Domain models for the quote server.
//!
//! This module groups the state and pricing logic that every connection shares:
//! - `price_store`: per-symbol current price and rolling history.
//! - `random_walk`: synthetic price movement used when no live quote is available.
//! - `live_quote`: adapter over the external quote provider.
//! - `quote_aggregator`: builds one ordered `prices` batch per tick.

pub mod live_quote;
pub mod price_store;
pub mod quote_aggregator;
pub mod random_walk;

/// Round to whole cents, half away from zero.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
