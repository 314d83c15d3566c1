//! Command-line arguments for the Quote Client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::Parser;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Quote server address as `host:port`.
    #[clap(long, default_value = "127.0.0.1:3000")]
    pub server: String,

    /// Ask the server for an extra snapshot every N milliseconds.
    #[clap(long)]
    pub snapshot_every_ms: Option<u64>,

    /// Override this connection's push interval in milliseconds.
    #[clap(long)]
    pub interval_ms: Option<u64>,

    /// Number of history points drawn in each sparkline.
    #[clap(long, default_value_t = 30)]
    pub spark_width: usize,
}
