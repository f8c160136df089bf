use crate::broadcast::Fanout;
use crate::room::{Connection, RoomRegistry};
use huddle_core::{PeerInfo, RoomId, ServerMessage};
use std::sync::Arc;
use tracing::info;

/// Join, leave and disconnect transitions for (connection, room) pairs.
///
/// This is the only writer of the registry.
#[derive(Clone)]
pub struct PeerLifecycle {
    registry: Arc<RoomRegistry>,
    fanout: Fanout,
}

impl PeerLifecycle {
    pub fn new(registry: Arc<RoomRegistry>, fanout: Fanout) -> Self {
        Self { registry, fanout }
    }

    /// Joining a room twice only refreshes the display name and resends the
    /// private snapshot; the rest of the room hears about the first join only.
    ///
    /// Both messages are queued under the room's lock, so a concurrent leave
    /// is seen by the joiner either in the snapshot or as a later `peer-left`.
    pub fn join(&self, connection: &mut Connection, room_id: RoomId, display_name: String) {
        connection.rooms.insert(room_id.clone());

        let peer = PeerInfo {
            connection_id: connection.id(),
            user_id: connection.user_id().clone(),
            display_name,
        };

        let added = self.registry.add_member(&room_id, peer.clone(), |added| {
            self.fanout.send_to(
                &peer.connection_id,
                ServerMessage::ExistingPeers {
                    room_id: room_id.clone(),
                    peers: added.others.clone(),
                },
            );

            if added.newly_joined {
                self.fanout.deliver_to(
                    &added.others,
                    ServerMessage::PeerJoined {
                        room_id: room_id.clone(),
                        peer: peer.clone(),
                    },
                    None,
                );
            }
        });

        if added.newly_joined {
            info!(
                connection_id = %peer.connection_id,
                room_id = %room_id,
                peers = added.others.len() + 1,
                "Peer joined room"
            );
        }
    }

    /// Leaving a room that was never joined does nothing.
    pub fn leave(&self, connection: &mut Connection, room_id: &RoomId) {
        if !connection.rooms.remove(room_id) {
            return;
        }
        self.depart(connection, room_id);
    }

    /// Leaves every room the connection is still in. Consumes the
    /// connection, so it can only happen once.
    pub fn disconnect_cleanup(&self, mut connection: Connection) {
        let rooms = std::mem::take(&mut connection.rooms);
        for room_id in &rooms {
            self.depart(&connection, room_id);
        }

        info!(
            connection_id = %connection.id(),
            rooms = rooms.len(),
            "Connection cleaned up"
        );
    }

    fn depart(&self, connection: &Connection, room_id: &RoomId) {
        let departed = self
            .registry
            .remove_member(room_id, &connection.id(), |removed| {
                self.fanout.deliver_to(
                    &removed.remaining,
                    ServerMessage::PeerLeft {
                        room_id: room_id.clone(),
                        peer: removed.member.clone(),
                    },
                    None,
                );
            });

        if let Some(removed) = departed {
            info!(
                connection_id = %connection.id(),
                room_id = %room_id,
                peers = removed.remaining.len(),
                "Peer left room"
            );
        }
    }
}
