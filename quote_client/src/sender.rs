//! Sending requests to the quote server.
//!
//! This module provides a small helper for encoding and sending `ClientRequest` lines
//! and for running a background loop that asks for periodic snapshots.
use log::{debug, error, info};
use quote_common::{ClientRequest, Result};
use std::io::Write;
use std::net::TcpStream;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread;
use std::time::Duration;

/// Helper type for sending requests to the server.
pub struct CommandSender;

impl CommandSender {
    /// Write one request line to `stream`.
    pub fn send_request(stream: &mut TcpStream, request: ClientRequest) -> Result<()> {
        debug!("Sending request: {:?}", request);
        stream.write_all(&request.to_line()?)?;
        Ok(())
    }

    /// Request a snapshot every `every` until `shutdown` is set or the socket fails.
    pub fn start_snapshot_thread(
        mut stream: TcpStream,
        every: Duration,
        shutdown: Arc<AtomicBool>,
    ) {
        info!("Snapshot thread started, every {:?}", every);
        thread::spawn(move || {
            while !shutdown.load(Ordering::Relaxed) {
                thread::sleep(every);
                if shutdown.load(Ordering::Relaxed) {
                    break;
                }
                if let Err(e) = Self::send_request(&mut stream, ClientRequest::Snapshot) {
                    error!("SNAPSHOT THREAD ERROR: {}", e);
                    break;
                }
            }
            info!("Snapshot thread stopping...");
        });
    }
}
