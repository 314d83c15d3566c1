//! Server configuration from command-line flags and environment variables.
//!
//! A `.env` file in the working directory is loaded first, so every setting can come from
//! the flag, the environment, or the file, in that order of precedence.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use quote_common::net::{DEFAULT_PORT, addr};
use quote_common::symbols::DEFAULT_SYMBOLS;
use quote_common::{Result, StreamError, SymbolRegistry};

use crate::model::live_quote::{FINNHUB_BASE_URL, FinnhubProvider, QuoteProvider};

/// Tick period used when none (or an unusable one) is configured.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;

/// Command-line and environment settings of the quote server.
#[derive(Parser, Debug, Clone)]
#[command(version, about = "Streams periodic price quotes to connected clients")]
pub struct ServerConfig {
    /// Address to bind the push channel to.
    #[arg(long, env = "BIND", default_value = "0.0.0.0")]
    pub bind: String,

    /// TCP port of the push channel.
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Default per-session tick period in milliseconds.
    #[arg(
        long,
        env = "POLL_INTERVAL_MS",
        default_value_t = DEFAULT_POLL_INTERVAL_MS,
        value_parser = lenient_interval_ms
    )]
    pub poll_interval_ms: u64,

    /// Comma-separated ticker symbols to track.
    #[arg(long, env = "SYMBOLS", default_value = DEFAULT_SYMBOLS)]
    pub symbols: String,

    /// Finnhub API key; enables live quotes when present.
    #[arg(long, env = "FINNHUB_API_KEY", hide_env_values = true)]
    pub provider_api_key: Option<String>,

    /// Finnhub REST base URL.
    #[arg(long, env = "FINNHUB_URL", default_value = FINNHUB_BASE_URL)]
    pub provider_url: String,
}

/// Accept any value; zero or non-numeric input falls back to the default period.
fn lenient_interval_ms(raw: &str) -> std::result::Result<u64, String> {
    Ok(raw
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|ms| *ms > 0)
        .unwrap_or(DEFAULT_POLL_INTERVAL_MS))
}

impl ServerConfig {
    /// Load configuration from `.env`, the environment and CLI args.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::parse()
    }

    /// Resolve bind address + port into a [`SocketAddr`].
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        addr(&self.bind, self.port).parse::<SocketAddr>().map_err(|e| {
            StreamError::Config(format!("invalid bind address {}:{}: {}", self.bind, self.port, e))
        })
    }

    /// Default tick period of every new session.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Parsed symbol registry.
    pub fn registry(&self) -> Result<SymbolRegistry> {
        self.symbols.parse()
    }

    /// API key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        self.provider_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Live quote provider, if an API key is configured.
    pub fn live_provider(&self) -> Result<Option<Box<dyn QuoteProvider>>> {
        let Some(key) = self.api_key() else {
            return Ok(None);
        };
        let provider = FinnhubProvider::new(&self.provider_url, key)
            .map_err(|e| StreamError::Config(format!("cannot build quote provider: {}", e)))?;
        Ok(Some(Box::new(provider)))
    }
}
