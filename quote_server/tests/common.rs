#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam_channel::Receiver;
use quote_common::{QuoteResult, ServerMessage, SymbolRegistry};
use quote_server::model::live_quote::QuoteProvider;
use quote_server::model::price_store::PriceStore;
use quote_server::model::quote_aggregator::QuoteAggregator;
use rand::SeedableRng;
use rand::rngs::StdRng;

pub fn aggregator_with(
    symbols: &str,
    provider: Option<Box<dyn QuoteProvider>>,
) -> Arc<QuoteAggregator> {
    let registry: SymbolRegistry = symbols.parse().unwrap();
    let store = PriceStore::with_prices(registry.iter().map(|s| (s.to_string(), 100.0)));
    Arc::new(QuoteAggregator::new(
        registry,
        Arc::new(Mutex::new(store)),
        provider,
        StdRng::seed_from_u64(17),
    ))
}

pub fn aggregator(symbols: &str) -> Arc<QuoteAggregator> {
    aggregator_with(symbols, None)
}

pub fn expect_symbols(rx: &Receiver<ServerMessage>) -> SymbolRegistry {
    match rx.recv_timeout(Duration::from_secs(2)) {
        Ok(ServerMessage::Symbols(registry)) => registry,
        other => panic!("expected symbols, got {other:?}"),
    }
}

pub fn expect_prices(rx: &Receiver<ServerMessage>, timeout: Duration) -> Vec<QuoteResult> {
    match rx.recv_timeout(timeout) {
        Ok(ServerMessage::Prices(batch)) => batch,
        other => panic!("expected prices, got {other:?}"),
    }
}

pub fn count_prices(rx: &Receiver<ServerMessage>) -> usize {
    rx.try_iter()
        .filter(|m| matches!(m, ServerMessage::Prices(_)))
        .count()
}
