use dashmap::DashMap;
use huddle_core::{ConnectionId, ServerMessage, UserId};
use tokio::sync::mpsc;
use tracing::debug;

struct ConnectionHandle {
    user_id: UserId,
    outbound: mpsc::UnboundedSender<ServerMessage>,
}

/// Live connections and their outbound queues.
///
/// Delivery is an unbounded channel send: it never blocks, and messages
/// pushed by one task reach the destination in the order they were pushed.
#[derive(Default)]
pub struct ConnectionTable {
    connections: DashMap<ConnectionId, ConnectionHandle>,
}

impl ConnectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &self,
        id: ConnectionId,
        user_id: UserId,
        outbound: mpsc::UnboundedSender<ServerMessage>,
    ) {
        self.connections
            .insert(id, ConnectionHandle { user_id, outbound });
    }

    pub fn unregister(&self, id: &ConnectionId) {
        self.connections.remove(id);
    }

    /// Best effort. Returns false when the connection is gone or its queue is closed.
    pub fn deliver(&self, id: &ConnectionId, message: ServerMessage) -> bool {
        let Some(handle) = self.connections.get(id) else {
            debug!(connection_id = %id, kind = message.kind(), "Dropping message for unknown connection");
            return false;
        };

        if handle.outbound.send(message).is_err() {
            debug!(connection_id = %id, "Outbound queue closed");
            return false;
        }
        true
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.connections.contains_key(id)
    }

    pub fn user_id(&self, id: &ConnectionId) -> Option<UserId> {
        self.connections.get(id).map(|h| h.user_id.clone())
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
