//! Channel session lifecycle: one connected client from upgrade through
//! disconnect.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use metrics::{counter, gauge, histogram};
use tracing::{debug, info, instrument, warn};

use crate::metrics::{
    WS_CONNECTION_DURATION_SECONDS, WS_CONNECTIONS_ACTIVE, WS_CONNECTIONS_TOTAL,
    WS_DISCONNECTIONS_TOTAL,
};

use super::dispatch::{Dispatch, PushDispatcher};
use super::messages::{ClientMessage, parse_client_message};
use super::registry::{Session, SessionRegistry};

/// Ping cadence and pong deadline for a channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Heartbeat {
    /// Interval between server pings.
    pub interval: Duration,
    /// Disconnect after this long without a pong.
    pub timeout: Duration,
}

impl Default for Heartbeat {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Run a channel session for a connected client.
///
/// 1. Registers the session and pushes `asiWelcome`
/// 2. Forwards queued pushes and sends periodic pings
/// 3. Hands inbound text frames to the dispatcher
/// 4. Evicts the session on disconnect; in-flight analyses are left to drop
#[instrument(skip_all, fields(peer = %peer))]
pub async fn run_ws_session(
    ws: WebSocket,
    peer: String,
    registry: Arc<SessionRegistry>,
    dispatcher: PushDispatcher,
    heartbeat: Heartbeat,
) {
    let (mut ws_tx, mut ws_rx) = ws.split();
    let (session, mut send_rx) = registry.create(peer);
    let session_id = session.id.clone();

    let connection_start = std::time::Instant::now();
    info!(session_id = %session_id, "client connected");
    counter!(WS_CONNECTIONS_TOTAL).increment(1);
    gauge!(WS_CONNECTIONS_ACTIVE).increment(1.0);

    let _ = dispatcher.welcome(&session);

    let outbound_session = Arc::clone(&session);
    let mut outbound = tokio::spawn(async move {
        let mut ping_interval = tokio::time::interval(heartbeat.interval);
        // Skip the immediate first tick
        let _ = ping_interval.tick().await;

        loop {
            tokio::select! {
                msg = send_rx.recv() => {
                    let Some(text) = msg else { break };
                    if ws_tx.send(Message::Text(text.as_str().to_owned().into())).await.is_err() {
                        break;
                    }
                }
                _ = ping_interval.tick() => {
                    if !outbound_session.check_alive()
                        && outbound_session.last_pong_elapsed() > heartbeat.timeout
                    {
                        warn!(session_id = %outbound_session.id, "client unresponsive for {:?}, disconnecting", heartbeat.timeout);
                        break;
                    }
                    if ws_tx.send(Message::Ping(Vec::new().into())).await.is_err() {
                        break;
                    }
                }
            }
        }
        let _ = ws_tx.close().await;
    });

    loop {
        tokio::select! {
            frame = ws_rx.next() => {
                let Some(Ok(msg)) = frame else { break };
                let text = match msg {
                    Message::Text(ref t) => Some(t.to_string()),
                    Message::Binary(ref data) => {
                        if let Ok(s) = std::str::from_utf8(data) {
                            Some(s.to_owned())
                        } else {
                            debug!(session_id = %session_id, len = data.len(), "ignoring non-UTF8 binary frame");
                            None
                        }
                    }
                    Message::Close(_) => {
                        info!(session_id = %session_id, "client sent close frame");
                        break;
                    }
                    Message::Ping(_) | Message::Pong(_) => {
                        session.mark_alive();
                        None
                    }
                };
                let Some(text) = text else { continue };
                session.mark_alive();
                let _ = handle_inbound(&text, &session, &dispatcher);
            }
            // Writer stopped (heartbeat timeout or socket error).
            _ = &mut outbound => break,
        }
    }

    let _ = registry.remove(&session_id);
    info!(session_id = %session_id, "client disconnected");
    counter!(WS_DISCONNECTIONS_TOTAL).increment(1);
    gauge!(WS_CONNECTIONS_ACTIVE).decrement(1.0);
    histogram!(WS_CONNECTION_DURATION_SECONDS).record(connection_start.elapsed().as_secs_f64());
    outbound.abort();
}

/// Decode one inbound frame and act on it.
///
/// Undecodable frames get an `asiError` push and leave the connection open.
pub fn handle_inbound(
    text: &str,
    session: &Session,
    dispatcher: &PushDispatcher,
) -> Option<Dispatch> {
    match parse_client_message(text) {
        Ok(ClientMessage::RequestAnalysis(request)) => {
            debug!(session_id = %session.id, request_id = ?request.request_id, "analysis requested");
            Some(dispatcher.request_analysis(&session.id, request))
        }
        Err(err) => {
            let _ = dispatcher.reject_message(session, &err);
            None
        }
    }
}
