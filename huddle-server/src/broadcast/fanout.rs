use crate::room::RoomRegistry;
use crate::signaling::ConnectionTable;
use huddle_core::{ConnectionId, PeerInfo, RoomId, ServerMessage};
use std::sync::Arc;
use tracing::trace;

/// Room-wide delivery to the current membership.
#[derive(Clone)]
pub struct Fanout {
    registry: Arc<RoomRegistry>,
    connections: Arc<ConnectionTable>,
}

impl Fanout {
    pub fn new(registry: Arc<RoomRegistry>, connections: Arc<ConnectionTable>) -> Self {
        Self {
            registry,
            connections,
        }
    }

    /// Sends `message` to every member of `room_id` except `exclude`.
    /// Returns how many queues accepted it. An empty room is not an error.
    pub fn broadcast(
        &self,
        room_id: &RoomId,
        message: ServerMessage,
        exclude: Option<ConnectionId>,
    ) -> usize {
        let members = self.registry.list_members(room_id);
        let sent = self.deliver_to(&members, message, exclude);

        trace!(room_id = %room_id, recipients = sent, "Broadcast");
        sent
    }

    /// Same as `broadcast` but over a membership snapshot the caller already holds.
    pub fn deliver_to(
        &self,
        members: &[PeerInfo],
        message: ServerMessage,
        exclude: Option<ConnectionId>,
    ) -> usize {
        members
            .iter()
            .filter(|peer| Some(peer.connection_id) != exclude)
            .filter(|peer| self.connections.deliver(&peer.connection_id, message.clone()))
            .count()
    }

    /// Private delivery to a single connection.
    pub fn send_to(&self, connection_id: &ConnectionId, message: ServerMessage) -> bool {
        self.connections.deliver(connection_id, message)
    }
}
