//! Live quotes from the Finnhub `/quote` endpoint.
//!
//! The provider's payload is translated into [`LiveQuote`] here and nowhere else; the rest
//! of the server only sees the [`QuoteProvider`] trait. A quote is accepted when the
//! response status is a success and the `c` (current price) field is a JSON number.
//! Any other outcome is a [`ProviderError`] that the caller answers with a simulated
//! price. Nothing is retried.

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;
use thiserror::Error;

use super::round_cents;

/// Default Finnhub REST base URL.
pub const FINNHUB_BASE_URL: &str = "https://finnhub.io/api/v1";

/// A quote resolved from the external provider.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveQuote {
    /// Current price, rounded to cents.
    pub price: f64,
    /// Opening price of the day, when the provider reports one.
    pub open: Option<f64>,
    /// Previous close, when the provider reports one.
    pub prev_close: Option<f64>,
}

/// Why a live quote could not be obtained.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Network or HTTP client failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider answered with a non-success status.
    #[error("http {0}")]
    Status(u16),

    /// Body was not JSON or lacked a numeric current price.
    #[error("invalid data: {0}")]
    Payload(String),
}

/// Source of live quotes for a single symbol.
pub trait QuoteProvider: Send + Sync {
    /// Fetch the latest quote for `symbol`.
    fn fetch_quote(&self, symbol: &str) -> Result<LiveQuote, ProviderError>;
}

/// Translate a Finnhub `/quote` body (`{"c":..,"o":..,"pc":..}`) into a [`LiveQuote`].
///
/// `o` and `pc` are optional; missing, non-numeric and zero values become `None`.
pub fn parse_finnhub_quote(body: &str) -> Result<LiveQuote, ProviderError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| ProviderError::Payload(e.to_string()))?;
    let price = value
        .get("c")
        .and_then(Value::as_f64)
        .ok_or_else(|| ProviderError::Payload("missing numeric field `c`".to_string()))?;

    let optional = |field: &str| {
        value
            .get(field)
            .and_then(Value::as_f64)
            .filter(|v| *v != 0.0)
            .map(round_cents)
    };

    Ok(LiveQuote {
        price: round_cents(price),
        open: optional("o"),
        prev_close: optional("pc"),
    })
}

/// [`QuoteProvider`] backed by Finnhub's REST API.
pub struct FinnhubProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl FinnhubProvider {
    /// Create a provider for `base_url` (no trailing `/quote`) authenticated with `api_key`.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}

impl QuoteProvider for FinnhubProvider {
    fn fetch_quote(&self, symbol: &str) -> Result<LiveQuote, ProviderError> {
        let url = format!("{}/quote", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("symbol", symbol), ("token", self.api_key.as_str())])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }
        let body = response.text()?;
        parse_finnhub_quote(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_quote() {
        let body = r#"{"c":187.444,"h":190.1,"l":185.0,"o":186.006,"pc":185.5,"t":1700000000}"#;
        let quote = parse_finnhub_quote(body).unwrap();
        assert_eq!(
            quote,
            LiveQuote {
                price: 187.44,
                open: Some(186.01),
                prev_close: Some(185.5),
            }
        );
    }

    #[test]
    fn missing_or_zero_optionals_become_none() {
        let quote = parse_finnhub_quote(r#"{"c":10,"o":0,"pc":"n/a"}"#).unwrap();
        assert_eq!(quote.price, 10.0);
        assert_eq!(quote.open, None);
        assert_eq!(quote.prev_close, None);
    }

    #[test]
    fn non_numeric_current_price_is_rejected() {
        for body in [r#"{"c":"187.4"}"#, r#"{"o":1}"#, "null", r#"{"error":"limit"}"#, "<html>"] {
            assert!(
                matches!(parse_finnhub_quote(body), Err(ProviderError::Payload(_))),
                "accepted {body}"
            );
        }
    }

    #[test]
    fn base_url_loses_trailing_slash() {
        let provider = FinnhubProvider::new("http://localhost:9/api/v1/", "key").unwrap();
        assert_eq!(provider.base_url, "http://localhost:9/api/v1");
    }
}
