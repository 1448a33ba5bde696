//! Room registry and broadcast fan-out.
//!
//! A [`Room`] maps client names to live connection handles and delivers
//! each message to every registered connection. Delivery goes through a
//! per-client outbox channel drained by that client's writer task, so a
//! stalled peer can never block fan-out to the rest.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::extract::ws::Message;
use tokio::sync::{mpsc, RwLock};

/// Statistics for monitoring room health.
#[derive(Debug, Clone, Default)]
pub struct RoomStats {
    pub messages_broadcast: u64,
    pub delivery_failures: u64,
    pub members: usize,
}

/// Atomic room stats — lock-free on the broadcast path.
struct AtomicRoomStats {
    messages_broadcast: AtomicU64,
    delivery_failures: AtomicU64,
}

impl AtomicRoomStats {
    fn new() -> Self {
        Self {
            messages_broadcast: AtomicU64::new(0),
            delivery_failures: AtomicU64::new(0),
        }
    }
}

/// Sending half of a client's outbox.
///
/// The relay loop owns the receiving half and pumps it into the client's
/// WebSocket sink. The room holds one handle per member for the duration
/// of membership; dropping the handle (on leave or displacement) closes
/// the outbox and lets the writer task wind down.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    outbox: mpsc::UnboundedSender<Message>,
}

impl ClientHandle {
    /// Create a handle together with the receiving half of its outbox.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { outbox: tx }, rx)
    }

    /// Queue a frame for delivery to this client.
    pub fn send(&self, msg: Message) -> Result<(), mpsc::error::SendError<Message>> {
        self.outbox.send(msg)
    }

    /// Whether the receiving half is gone (writer task exited).
    pub fn is_closed(&self) -> bool {
        self.outbox.is_closed()
    }

    /// Whether two handles feed the same outbox.
    pub fn same_outbox(&self, other: &ClientHandle) -> bool {
        self.outbox.same_channel(&other.outbox)
    }
}

/// A named set of connected clients sharing one broadcast domain.
///
/// Created once at process start and shared across all connection tasks.
/// The connection map is mutated on join/leave and enumerated on every
/// broadcast, so it sits behind an `RwLock`.
pub struct Room {
    name: String,
    connections: RwLock<HashMap<String, ClientHandle>>,
    stats: AtomicRoomStats,
}

impl Room {
    /// Create an empty room.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            connections: RwLock::new(HashMap::new()),
            stats: AtomicRoomStats::new(),
        }
    }

    /// The room's name. Informational only — nothing branches on it.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a client's connection handle under its name.
    ///
    /// Unconditional map write: a second join under the same name
    /// silently displaces the first entry. Names are not validated.
    pub async fn join(&self, name: impl Into<String>, handle: ClientHandle) {
        let mut conns = self.connections.write().await;
        conns.insert(name.into(), handle);
    }

    /// Remove a client's entry. Returns false if the name was absent
    /// (e.g. a duplicate-name join already replaced it).
    pub async fn leave(&self, name: &str) -> bool {
        let mut conns = self.connections.write().await;
        conns.remove(name).is_some()
    }

    /// Whether a client is currently registered under `name`.
    pub async fn contains(&self, name: &str) -> bool {
        self.connections.read().await.contains_key(name)
    }

    /// Names of all currently registered clients. Order is arbitrary.
    pub async fn members(&self) -> Vec<String> {
        self.connections.read().await.keys().cloned().collect()
    }

    /// Snapshot of the current (name, handle) pairs.
    pub async fn connections(&self) -> Vec<(String, ClientHandle)> {
        self.connections
            .read()
            .await
            .iter()
            .map(|(n, h)| (n.clone(), h.clone()))
            .collect()
    }

    /// Number of currently registered clients.
    pub async fn member_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Send a byte message to every client in the room as a text frame.
    ///
    /// Best-effort fan-out: a failure for one recipient is logged and
    /// skipped, delivery to the rest continues, and the failed entry
    /// stays registered. Removal only happens through that client's own
    /// relay loop. No partial-success result is reported.
    pub async fn broadcast(&self, message: &[u8]) {
        self.broadcast_text(&String::from_utf8_lossy(message)).await;
    }

    /// Send a text message to every client in the room.
    pub async fn broadcast_text(&self, message: &str) {
        let snapshot = self.connections().await;
        self.stats.messages_broadcast.fetch_add(1, Ordering::Relaxed);

        let frame = Message::Text(message.to_owned().into());
        for (peer, handle) in snapshot {
            if let Err(e) = handle.send(frame.clone()) {
                self.stats.delivery_failures.fetch_add(1, Ordering::Relaxed);
                log::warn!("broadcast to {peer} failed: {e}");
            }
        }
    }

    /// Get room statistics (counters are a lock-free snapshot).
    pub async fn stats(&self) -> RoomStats {
        let members = self.member_count().await;
        RoomStats {
            messages_broadcast: self.stats.messages_broadcast.load(Ordering::Relaxed),
            delivery_failures: self.stats.delivery_failures.load(Ordering::Relaxed),
            members,
        }
    }
}
