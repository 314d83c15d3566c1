use std::sync::{Arc, Mutex};

use log::info;
use quote_common::Result;
use quote_server::config::ServerConfig;
use quote_server::model::price_store::PriceStore;
use quote_server::model::quote_aggregator::QuoteAggregator;
use quote_server::receiver::QuoteReceiver;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() -> Result<()> {
    init_logger();
    let config = ServerConfig::load();

    let registry = config.registry()?;
    info!("Tracking symbols: {:?}", registry.as_slice());

    let provider = config.live_provider()?;
    let store = Arc::new(Mutex::new(PriceStore::new(&registry)));
    let aggregator = Arc::new(QuoteAggregator::new(
        registry,
        store,
        provider,
        StdRng::from_os_rng(),
    ));
    if aggregator.live_enabled() {
        info!("Live quotes enabled via {}", config.provider_url);
    } else {
        info!("No provider API key configured, streaming simulated quotes");
    }

    let receiver = QuoteReceiver::new(config.socket_addr()?)?;
    info!("Default poll interval: {:?}", config.poll_interval());
    receiver.serve(aggregator, config.poll_interval())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
