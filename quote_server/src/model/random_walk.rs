//! Synthetic price movement.
//!
//! Each step perturbs the current price by a uniformly drawn percentage. Most steps use a
//! narrow "normal" band; with probability [`SHOCK_PROBABILITY`] a wider "shock" band is
//! used instead. Prices are rounded to cents and never drop below [`MIN_PRICE`].

use quote_common::Result;
use rand::Rng;

use super::price_store::PriceStore;
use super::round_cents;

/// Probability that a step uses the shock band.
pub const SHOCK_PROBABILITY: f64 = 0.02;
/// Half-width of the shock band (±5%).
pub const SHOCK_RANGE: f64 = 0.05;
/// Half-width of the normal band (±0.5%).
pub const NORMAL_RANGE: f64 = 0.005;
/// Smallest price a step can produce.
pub const MIN_PRICE: f64 = 0.01;

/// Outcome of one simulated step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkStep {
    /// New price, rounded to cents.
    pub price: f64,
    /// `price` minus the previous price, rounded to cents.
    pub change: f64,
}

/// Draw the relative move for one step.
pub fn draw_pct<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let regime: f64 = rng.random();
    if regime < SHOCK_PROBABILITY {
        rng.random_range(-SHOCK_RANGE..SHOCK_RANGE)
    } else {
        rng.random_range(-NORMAL_RANGE..NORMAL_RANGE)
    }
}

/// Apply a relative move to `current`.
pub fn apply_pct(current: f64, pct: f64) -> WalkStep {
    let price = round_cents(current * (1.0 + pct)).max(MIN_PRICE);
    WalkStep {
        price,
        change: round_cents(price - current),
    }
}

/// Advance `symbol` by one random step and record the result in `store`.
pub fn simulate<R: Rng + ?Sized>(
    store: &mut PriceStore,
    symbol: &str,
    rng: &mut R,
) -> Result<WalkStep> {
    let current = store.read(symbol)?.current_price();
    let step = apply_pct(current, draw_pct(rng));
    store.record_price(symbol, step.price)?;
    Ok(step)
}
