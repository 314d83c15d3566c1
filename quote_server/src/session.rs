//! Per-connection streaming sessions.
//!
//! A session owns one client's repeating timer. Its lifecycle is
//! `Connected → Streaming → Disconnected`:
//!
//! - on start the symbol registry is pushed, then the timer is armed;
//! - every timer fire builds a batch through the shared [`QuoteAggregator`] and pushes it
//!   to this client only;
//! - `snapshot` requests push an extra batch without touching the timer's schedule;
//! - `interval` requests re-arm the timer with a new period;
//! - the session ends when it is told to stop, when its request channel closes, or when
//!   the client can no longer be written to.
//!
//! A failed batch is logged and that tick is skipped; the timer keeps running.
//!
//! Concurrency and shutdown:
//! - Each session runs on its own thread and multiplexes timer, requests and stop signal
//!   with crossbeam `select!`.
//! - [`SessionHandle::disconnect`] (or dropping the handle) signals stop and joins the
//!   thread, so once it returns no further push can happen for that session.

use std::io::Write;
use std::net::{Shutdown, TcpStream};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::Utc;
use crossbeam_channel::{Receiver, Sender, select, tick, unbounded};
use log::{debug, error, info, warn};
use quote_common::{ClientRequest, Health, Result, ServerMessage, StreamError};
use strum_macros::Display;

use crate::model::quote_aggregator::QuoteAggregator;

/// Opaque per-connection identifier.
pub type ConnectionId = u64;

/// Shortest tick period a client may request through an `interval` override.
pub const MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Lifecycle of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SessionState {
    /// Registry not yet delivered.
    Connected,
    /// Timer armed, batches flowing.
    Streaming,
    /// Terminal; the timer has been released.
    Disconnected,
}

/// Destination of one client's pushed messages.
pub trait PushSink: Send {
    /// Deliver `message`. An error means the client is gone.
    fn push(&mut self, message: &ServerMessage) -> Result<()>;
}

impl PushSink for TcpStream {
    fn push(&mut self, message: &ServerMessage) -> Result<()> {
        let line = message.to_line()?;
        let written = self.write_all(&line).and_then(|_| self.flush());
        if let Err(e) = written {
            // Unblock the reader half so the connection is torn down from both sides.
            let _ = self.shutdown(Shutdown::Both);
            return Err(e.into());
        }
        Ok(())
    }
}

impl PushSink for Sender<ServerMessage> {
    fn push(&mut self, message: &ServerMessage) -> Result<()> {
        self.send(message.clone())
            .map_err(|e| StreamError::ChannelSend(e.to_string()))
    }
}

/// Current liveness report.
pub fn health_report() -> Health {
    Health {
        status: "ok".to_string(),
        time: Utc::now().timestamp_millis(),
    }
}

/// Owner of a running session thread.
pub struct SessionHandle {
    id: ConnectionId,
    requests: Sender<ClientRequest>,
    stop: Sender<()>,
    thread: Option<JoinHandle<SessionState>>,
}

impl SessionHandle {
    /// Start streaming to `sink` every `interval`.
    pub fn spawn<S>(
        id: ConnectionId,
        aggregator: Arc<QuoteAggregator>,
        sink: S,
        interval: Duration,
    ) -> Self
    where
        S: PushSink + 'static,
    {
        let (requests_tx, requests_rx) = unbounded::<ClientRequest>();
        let (stop_tx, stop_rx) = unbounded::<()>();
        let thread = thread::spawn(move || {
            run_session(id, &aggregator, sink, interval, requests_rx, stop_rx)
        });
        Self {
            id,
            requests: requests_tx,
            stop: stop_tx,
            thread: Some(thread),
        }
    }

    /// Identifier of this session.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Forward a client request. Fails once the session has ended.
    pub fn request(&self, request: ClientRequest) -> Result<()> {
        self.requests
            .send(request)
            .map_err(|e| StreamError::ChannelSend(e.to_string()))
    }

    /// Whether the session thread is still running.
    pub fn is_streaming(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the timer and wait for the session thread to exit.
    pub fn disconnect(mut self) -> SessionState {
        self.shutdown()
    }

    fn shutdown(&mut self) -> SessionState {
        let Some(thread) = self.thread.take() else {
            return SessionState::Disconnected;
        };
        let _ = self.stop.send(());
        match thread.join() {
            Ok(state) => state,
            Err(_) => {
                error!("Session {} thread panicked", self.id);
                SessionState::Disconnected
            }
        }
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Session loop; returns the terminal state.
fn run_session<S: PushSink>(
    id: ConnectionId,
    aggregator: &QuoteAggregator,
    mut sink: S,
    interval: Duration,
    requests: Receiver<ClientRequest>,
    stop: Receiver<()>,
) -> SessionState {
    let mut state = SessionState::Connected;
    if let Err(e) = sink.push(&ServerMessage::Symbols(aggregator.registry().clone())) {
        warn!("Session {}: failed to send symbols: {}", id, e);
        return SessionState::Disconnected;
    }

    let mut ticker = tick(interval);
    state = transition(id, state, SessionState::Streaming);

    loop {
        let mut rearm: Option<Duration> = None;
        let mut delivered: Result<()> = Ok(());
        select! {
            recv(stop) -> _ => break,
            recv(ticker) -> _ => delivered = push_batch(id, aggregator, &mut sink, "tick"),
            recv(requests) -> msg => match msg {
                Ok(request) => {
                    debug!("Session {}: {} request", id, request);
                    match request {
                        ClientRequest::Snapshot => {
                            delivered = push_batch(id, aggregator, &mut sink, "snapshot");
                        }
                        ClientRequest::Interval(ms) => {
                            rearm = Some(Duration::from_millis(ms).max(MIN_INTERVAL));
                        }
                        ClientRequest::Health => {
                            delivered = sink.push(&ServerMessage::Health(health_report()));
                        }
                    }
                }
                Err(_) => break,
            },
        }

        if let Err(e) = delivered {
            info!("Session {}: client unreachable: {}", id, e);
            break;
        }
        if let Some(period) = rearm {
            info!("Session {}: interval set to {:?}", id, period);
            ticker = tick(period);
        }
    }

    drop(ticker);
    transition(id, state, SessionState::Disconnected)
}

/// Build and push one batch. Only delivery failures are returned; a failed batch skips
/// the push.
fn push_batch<S: PushSink>(
    id: ConnectionId,
    aggregator: &QuoteAggregator,
    sink: &mut S,
    cause: &str,
) -> Result<()> {
    match aggregator.get_batch() {
        Ok(batch) => {
            debug!("Session {}: pushing {} quotes ({})", id, batch.len(), cause);
            sink.push(&ServerMessage::Prices(batch))
        }
        Err(e) => {
            error!("Session {}: {} skipped: {}", id, cause, e);
            Ok(())
        }
    }
}

fn transition(id: ConnectionId, from: SessionState, to: SessionState) -> SessionState {
    debug!("Session {}: {} -> {}", id, from, to);
    to
}
