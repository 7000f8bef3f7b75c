//! Session registry for real-time channel connections.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use asi_core::ids::SessionId;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

/// Lifecycle state of a channel session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// The connection is open and deliveries are accepted.
    Connected,
    /// Terminal. The session has been evicted.
    Disconnected,
}

/// Why a push could not be queued.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SendError {
    /// The outbound queue is at capacity.
    #[error("outbound queue full")]
    Full,
    /// The writer task has stopped.
    #[error("outbound queue closed")]
    Closed,
    /// The payload could not be serialized.
    #[error("failed to encode payload: {0}")]
    Encode(String),
}

/// Registry lookup failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No live session under this id.
    #[error("session not found: {0}")]
    NotFound(SessionId),
}

/// One connected channel client.
pub struct Session {
    /// Session id assigned at connect time.
    pub id: SessionId,
    /// Rate limit key of the peer.
    pub peer: String,
    /// When the connection was accepted.
    pub connected_at: DateTime<Utc>,
    disconnected: AtomicBool,
    sequence: AtomicU64,
    tx: mpsc::Sender<Arc<String>>,
    dropped_messages: AtomicU64,
    is_alive: AtomicBool,
    last_pong: Mutex<Instant>,
}

impl Session {
    fn new(peer: String, tx: mpsc::Sender<Arc<String>>) -> Self {
        Self {
            id: SessionId::new(),
            peer,
            connected_at: Utc::now(),
            disconnected: AtomicBool::new(false),
            sequence: AtomicU64::new(0),
            tx,
            dropped_messages: AtomicU64::new(0),
            is_alive: AtomicBool::new(true),
            last_pong: Mutex::new(Instant::now()),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        if self.disconnected.load(Ordering::Acquire) {
            SessionState::Disconnected
        } else {
            SessionState::Connected
        }
    }

    /// Allocate the next request sequence number (starting at 1).
    pub fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Queue a text frame for the writer task.
    pub fn send(&self, message: Arc<String>) -> Result<(), SendError> {
        if self.state() == SessionState::Disconnected {
            return Err(SendError::Closed);
        }
        self.tx.try_send(message).map_err(|e| {
            let _ = self.dropped_messages.fetch_add(1, Ordering::Relaxed);
            match e {
                mpsc::error::TrySendError::Full(_) => SendError::Full,
                mpsc::error::TrySendError::Closed(_) => SendError::Closed,
            }
        })
    }

    /// Serialize and queue a payload.
    pub fn send_json<T: Serialize>(&self, value: &T) -> Result<(), SendError> {
        let json = serde_json::to_string(value).map_err(|e| SendError::Encode(e.to_string()))?;
        self.send(Arc::new(json))
    }

    /// Frames that could not be queued.
    pub fn drop_count(&self) -> u64 {
        self.dropped_messages.load(Ordering::Relaxed)
    }

    /// Record a pong (or any inbound activity).
    pub fn mark_alive(&self) {
        self.is_alive.store(true, Ordering::Relaxed);
        *self.last_pong.lock() = Instant::now();
    }

    /// Check and reset the alive flag. `true` if the peer answered since the last check.
    pub fn check_alive(&self) -> bool {
        self.is_alive.swap(false, Ordering::Relaxed)
    }

    /// Time since the last pong or connect.
    pub fn last_pong_elapsed(&self) -> Duration {
        self.last_pong.lock().elapsed()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("peer", &self.peer)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// Concurrent map of live sessions.
pub struct SessionRegistry {
    sessions: DashMap<SessionId, Arc<Session>>,
    queue_capacity: usize,
}

impl SessionRegistry {
    /// Create an empty registry whose sessions get `queue_capacity` outbound slots.
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            queue_capacity: queue_capacity.max(1),
        }
    }

    /// Register a new connected session.
    ///
    /// The returned receiver feeds the connection's writer task.
    pub fn create(&self, peer: impl Into<String>) -> (Arc<Session>, mpsc::Receiver<Arc<String>>) {
        let (tx, rx) = mpsc::channel(self.queue_capacity);
        let session = Arc::new(Session::new(peer.into(), tx));
        let _ = self
            .sessions
            .insert(session.id.clone(), Arc::clone(&session));
        debug!(session_id = %session.id, peer = %session.peer, "session registered");
        (session, rx)
    }

    /// Mark a session disconnected and evict it. Unknown ids are a no-op.
    pub fn remove(&self, id: &SessionId) -> bool {
        match self.sessions.remove(id) {
            Some((_, session)) => {
                session.disconnected.store(true, Ordering::Release);
                debug!(session_id = %id, "session removed");
                true
            }
            None => false,
        }
    }

    /// Look up a live session.
    pub fn resolve(&self, id: &SessionId) -> Result<Arc<Session>, RegistryError> {
        self.sessions
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| RegistryError::NotFound(id.clone()))
    }

    /// Number of live sessions.
    pub fn count(&self) -> usize {
        self.sessions.len()
    }

    /// Ids of all live sessions.
    pub fn ids(&self) -> Vec<SessionId> {
        self.sessions.iter().map(|e| e.key().clone()).collect()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn create_registers_connected_session() {
        let registry = SessionRegistry::default();
        let (session, _rx) = registry.create("10.0.0.1");
        assert!(session.id.as_str().starts_with(SessionId::PREFIX));
        assert_eq!(session.peer, "10.0.0.1");
        assert_eq!(session.state(), SessionState::Connected);
        assert_eq!(registry.count(), 1);
        assert_eq!(registry.ids(), vec![session.id.clone()]);
    }

    #[test]
    fn session_ids_are_unique() {
        let registry = SessionRegistry::default();
        let (a, _ra) = registry.create("p");
        let (b, _rb) = registry.create("p");
        assert_ne!(a.id, b.id);
        assert_eq!(registry.count(), 2);
    }

    #[test]
    fn resolve_unknown_is_not_found() {
        let registry = SessionRegistry::default();
        let id = SessionId::from("sess_missing");
        assert_matches!(registry.resolve(&id), Err(RegistryError::NotFound(ref missing)) if *missing == id);
    }

    #[test]
    fn remove_is_idempotent_and_terminal() {
        let registry = SessionRegistry::default();
        let (session, _rx) = registry.create("p");
        let id = session.id.clone();

        assert!(registry.remove(&id));
        assert!(!registry.remove(&id));
        assert_eq!(session.state(), SessionState::Disconnected);
        assert_matches!(registry.resolve(&id), Err(RegistryError::NotFound(_)));
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn remove_unknown_is_noop() {
        let registry = SessionRegistry::default();
        let (_session, _rx) = registry.create("p");
        assert!(!registry.remove(&SessionId::new()));
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn sequence_starts_at_one_and_increments() {
        let registry = SessionRegistry::default();
        let (session, _rx) = registry.create("p");
        assert_eq!(session.next_sequence(), 1);
        assert_eq!(session.next_sequence(), 2);
        assert_eq!(session.next_sequence(), 3);
    }

    #[tokio::test]
    async fn send_json_reaches_receiver() {
        let registry = SessionRegistry::default();
        let (session, mut rx) = registry.create("p");
        session
            .send_json(&serde_json::json!({"type": "asiWelcome"}))
            .unwrap();
        let frame = rx.recv().await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(parsed["type"], "asiWelcome");
    }

    #[test]
    fn send_to_full_queue_counts_drop() {
        let registry = SessionRegistry::new(1);
        let (session, _rx) = registry.create("p");
        assert!(session.send(Arc::new("one".into())).is_ok());
        assert_eq!(session.send(Arc::new("two".into())), Err(SendError::Full));
        assert_eq!(session.drop_count(), 1);
    }

    #[test]
    fn send_after_receiver_dropped_is_closed() {
        let registry = SessionRegistry::default();
        let (session, rx) = registry.create("p");
        drop(rx);
        assert_eq!(session.send(Arc::new("x".into())), Err(SendError::Closed));
    }

    #[test]
    fn send_after_remove_is_closed() {
        let registry = SessionRegistry::default();
        let (session, _rx) = registry.create("p");
        let _ = registry.remove(&session.id);
        assert_eq!(session.send(Arc::new("x".into())), Err(SendError::Closed));
    }

    #[test]
    fn alive_flag_resets_on_check() {
        let registry = SessionRegistry::default();
        let (session, _rx) = registry.create("p");
        assert!(session.check_alive());
        assert!(!session.check_alive());
        session.mark_alive();
        assert!(session.check_alive());
        assert!(session.last_pong_elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn concurrent_create_and_remove() {
        let registry = Arc::new(SessionRegistry::default());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        let (s, _rx) = registry.create(format!("peer-{i}"));
                        assert!(registry.resolve(&s.id).is_ok());
                        assert!(registry.remove(&s.id));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(registry.count(), 0);
    }
}
