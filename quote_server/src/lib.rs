//! Quote streaming server.
//!
//! Streams periodic price quotes for a fixed set of ticker symbols to every connected
//! client. Quotes come from Finnhub when an API key is configured and from a random walk
//! otherwise (or whenever a live fetch fails). Building blocks:
//!
//! - `model::price_store`: shared per-symbol price and rolling history.
//! - `model::live_quote` and `model::random_walk`: the two quote sources.
//! - `model::quote_aggregator`: one ordered batch per tick, never failing on provider
//!   errors.
//! - `session`: per-client timer thread pushing batches to that client only.
//! - `receiver`: TCP accept loop and per-connection request reader.
//! - `config`: flags, environment and `.env` settings.
//!
//! Network protocol (high‑level):
//! - Client opens a TCP connection; the server pushes `symbols` once, then `prices` every
//!   poll interval, each as one JSON line.
//! - Client may send `snapshot`, `interval` or `health` requests as JSON lines at any time.
#![warn(missing_docs)]

pub mod config;
pub mod model;
pub mod receiver;
pub mod session;
