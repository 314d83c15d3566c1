//! Accepting push-channel connections and reading client requests.

use crate::model::quote_aggregator::QuoteAggregator;
use crate::session::{ConnectionId, SessionHandle};
use log::{debug, error, info, warn};
use quote_common::{ClientRequest, Result};
use std::io::{BufRead, BufReader};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// TCP front door of the push channel.
///
/// Accepts client connections and gives each one its own [`SessionHandle`] plus a
/// reader thread that turns incoming JSON lines into [`ClientRequest`]s.
pub struct QuoteReceiver {
    /// The underlying TCP listening socket.
    pub(crate) socket: TcpListener,
}

impl QuoteReceiver {
    /// Bind a new TCP receiver to `bind_addr` (e.g., `0.0.0.0:3000`).
    pub fn new(bind_addr: SocketAddr) -> Result<Self> {
        let socket = TcpListener::bind(bind_addr)?;
        Ok(Self { socket })
    }

    /// Address actually bound (useful when binding port 0).
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Blocking accept loop. A failing connection never stops the loop.
    pub fn serve(self, aggregator: Arc<QuoteAggregator>, interval: Duration) -> Result<()> {
        info!("Quote server is listening on {}", self.socket.local_addr()?);

        for (id, stream) in (1..).zip(self.socket.incoming()) {
            match stream {
                Ok(stream) => {
                    let aggregator = Arc::clone(&aggregator);
                    thread::spawn(move || {
                        if let Err(e) = handle_connection(id, stream, aggregator, interval) {
                            error!("Connection {} failed: {}", id, e);
                        }
                    });
                }
                Err(e) => error!("TCP connection error: {}", e),
            }
        }
        Ok(())
    }
}

/// Run one client connection until it disconnects.
///
/// The session streams over a clone of `stream` while this thread reads requests from
/// it. EOF, a read error, or a session that has already ended tears the session down.
pub fn handle_connection(
    id: ConnectionId,
    stream: TcpStream,
    aggregator: Arc<QuoteAggregator>,
    interval: Duration,
) -> Result<()> {
    let peer = stream.peer_addr()?;
    info!("Client {} connected from {}", id, peer);

    let session = SessionHandle::spawn(id, aggregator, stream.try_clone()?, interval);
    let mut reader = BufReader::new(stream);
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) if line.trim().is_empty() => continue,
            Ok(_) => match ClientRequest::from_line(&line) {
                Ok(request) => {
                    if session.request(request).is_err() {
                        debug!("Client {}: session already ended", id);
                        break;
                    }
                }
                Err(e) => warn!("Client {}: ignoring bad request {:?}: {}", id, line.trim(), e),
            },
            Err(e) => {
                debug!("Client {}: read error: {}", id, e);
                break;
            }
        }
    }

    // A peer that stopped reading can leave the session blocked in a write.
    let _ = reader.get_ref().shutdown(Shutdown::Both);
    let state = session.disconnect();
    info!("Client {} disconnected ({})", id, state);
    Ok(())
}
