//!
//! Common types and utilities shared by the quote server and client.
//!
//! This crate aggregates:
//! - `error`: unified error type `StreamError` used across the workspace.
//! - `result`: handy `Result<T, StreamError>` alias.
//! - `symbols`: the ordered, de-duplicated registry of tracked ticker symbols.
//! - `message`: newline-delimited JSON messages exchanged over the push channel.
//! - `net`: networking defaults and small helpers.
#![warn(missing_docs)]
pub mod error;
pub mod message;
pub mod net;
pub mod result;
pub mod symbols;

pub use error::StreamError;
pub use message::{ClientRequest, Health, QuoteResult, ServerMessage};
pub use result::Result;
pub use symbols::SymbolRegistry;
