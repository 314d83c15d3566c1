//! Quote Client: a terminal client that connects to the quote server, prints the tracked
//! symbols, and renders every pushed `prices` batch as a small table with sparklines.
//! It can optionally override its push interval and request periodic snapshots.
//!
//! Usage example (CLI):
//! ```bash
//! quote_client --server 192.168.0.10:3000 --interval-ms 1000 --snapshot-every-ms 5000
//! ```
#![warn(missing_docs)]
mod args;
mod render;
mod sender;

use crate::args::Args;
use crate::sender::CommandSender;
use chrono::Local;
use clap::Parser;
use log::{debug, error, info, warn};
use quote_common::{ClientRequest, Result, ServerMessage, StreamError};
use std::io::{BufRead, BufReader};
use std::net::{Shutdown, TcpStream};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

/// Reads server messages line by line and prints them until the connection closes.
fn start_receiver_loop(
    stream: TcpStream,
    shutdown: Arc<AtomicBool>,
    spark_width: usize,
) -> Result<()> {
    info!("Quote receiver running on: {}", stream.local_addr()?);
    let mut reader = BufReader::new(stream);
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => {
                if !shutdown.load(Ordering::Relaxed) {
                    warn!("Server closed the connection");
                }
                break;
            }
            Ok(_) => match ServerMessage::from_line(&line) {
                Ok(ServerMessage::Symbols(registry)) => {
                    let symbols = registry.as_slice().join(", ");
                    info!("Tracking {} symbols: {}", registry.len(), symbols);
                }
                Ok(ServerMessage::Prices(batch)) => {
                    println!("{}", render::render_batch(&batch, Local::now(), spark_width));
                }
                Ok(ServerMessage::Health(health)) => {
                    info!("Server health: {} at {}", health.status, health.time);
                }
                Err(_) => debug!("Received non-JSON message: {}", line.trim()),
            },
            Err(e) => {
                if shutdown.load(Ordering::Relaxed) {
                    break;
                }
                error!("Receive data error: {}", e);
                return Err(StreamError::Io(e));
            }
        }
    }
    info!("Receiver loop stopping...");
    Ok(())
}

fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();

    info!("Connecting to quote server at {}", args.server);
    let mut stream = TcpStream::connect(args.server.trim())
        .map_err(|e| StreamError::Config(format!("Failed to connect to server: {}", e)))?;

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        let stream = stream.try_clone()?;
        ctrlc::set_handler(move || {
            info!("Ctrl+C received. Shutting down client...");
            shutdown.store(true, Ordering::SeqCst);
            let _ = stream.shutdown(Shutdown::Both);
        })
        .map_err(|e| StreamError::Config(format!("Error setting Ctrl+C handler: {}", e)))?;
    }

    if let Some(ms) = args.interval_ms {
        CommandSender::send_request(&mut stream, ClientRequest::Interval(ms))?;
        info!("Requested push interval of {} ms", ms);
    }
    CommandSender::send_request(&mut stream, ClientRequest::Health)?;

    if let Some(ms) = args.snapshot_every_ms.filter(|ms| *ms > 0) {
        CommandSender::start_snapshot_thread(
            stream.try_clone()?,
            Duration::from_millis(ms),
            shutdown.clone(),
        );
    }

    info!("Client is running. Press Ctrl+C to exit.");
    start_receiver_loop(stream, shutdown, args.spark_width)
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
