use huddle_core::{ConnectionId, RoomId, UserId};
use std::collections::BTreeSet;

/// One admitted connection, owned by its gateway task for its whole life.
///
/// The room set is the source of truth for disconnect cleanup, so cleanup
/// only touches rooms this connection actually joined.
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    user_id: UserId,
    pub(crate) rooms: BTreeSet<RoomId>,
}

impl Connection {
    pub(crate) fn new(id: ConnectionId, user_id: UserId) -> Self {
        Self {
            id,
            user_id,
            rooms: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn rooms(&self) -> impl Iterator<Item = &RoomId> {
        self.rooms.iter()
    }

    pub fn is_in(&self, room_id: &RoomId) -> bool {
        self.rooms.contains(room_id)
    }
}
