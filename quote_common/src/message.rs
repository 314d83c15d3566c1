//! Push-channel messages exchanged between server and client.
//!
//! Every message is one JSON object on its own line, tagged by `event` with an optional
//! `data` payload:
//!
//! - server → client: `symbols` (once, on connect), `prices` (every tick and every
//!   snapshot), `health` (reply to a health query).
//! - client → server: `snapshot`, `interval`, `health`.
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::error::StreamError;
use crate::symbols::SymbolRegistry;

/// One symbol's entry in a `prices` batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    /// Ticker symbol.
    pub symbol: String,
    /// Latest price, rounded to 2 decimal places.
    pub price: f64,
    /// Difference to the previous price, rounded to 2 decimal places.
    pub change: f64,
    /// Copy of the rolling price window, oldest first.
    pub history: Vec<f64>,
}

/// Liveness report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    /// Always `"ok"` while the process is serving.
    pub status: String,
    /// Server wall-clock time in milliseconds since the Unix epoch.
    pub time: i64,
}

/// Messages pushed by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Display)]
#[serde(tag = "event", content = "data", rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ServerMessage {
    /// Ordered symbol registry, sent once per connection.
    Symbols(SymbolRegistry),
    /// Full ordered batch of quotes.
    Prices(Vec<QuoteResult>),
    /// Answer to [`ClientRequest::Health`].
    Health(Health),
}

/// Requests a client may send at any time after connecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(tag = "event", content = "data", rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ClientRequest {
    /// Push one `prices` batch right away, outside the regular schedule.
    Snapshot,
    /// Replace this session's tick period, in milliseconds.
    Interval(u64),
    /// Ask for a [`Health`] report.
    Health,
}

/// Encode `value` as a single JSON line terminated by `\n`.
fn encode_line<T: Serialize>(value: &T) -> Result<Vec<u8>, StreamError> {
    let mut line = serde_json::to_vec(value)?;
    line.push(b'\n');
    Ok(line)
}

impl ServerMessage {
    /// Encode the message as one newline-terminated JSON line.
    pub fn to_line(&self) -> Result<Vec<u8>, StreamError> {
        encode_line(self)
    }

    /// Decode a message from one line (surrounding whitespace ignored).
    pub fn from_line(line: &str) -> Result<Self, StreamError> {
        Ok(serde_json::from_str(line.trim())?)
    }
}

impl ClientRequest {
    /// Encode the request as one newline-terminated JSON line.
    pub fn to_line(&self) -> Result<Vec<u8>, StreamError> {
        encode_line(self)
    }

    /// Decode a request from one line (surrounding whitespace ignored).
    pub fn from_line(line: &str) -> Result<Self, StreamError> {
        Ok(serde_json::from_str(line.trim())?)
    }
}
