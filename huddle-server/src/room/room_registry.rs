use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use huddle_core::{ConnectionId, PeerInfo, RoomId};
use std::collections::HashMap;

/// Result of inserting a member. `others` is the membership minus the
/// inserted connection, taken under the same lock as the insert.
#[derive(Debug)]
pub struct MemberAdded {
    pub newly_joined: bool,
    pub others: Vec<PeerInfo>,
}

/// Result of removing a member. `remaining` is taken under the same lock.
#[derive(Debug)]
pub struct MemberRemoved {
    pub member: PeerInfo,
    pub remaining: Vec<PeerInfo>,
}

/// Who is currently in which room.
///
/// Each room lives in one dashmap shard, so mutations of a single room are
/// serialized by that shard's lock. A room never survives its last member.
#[derive(Default)]
pub struct RoomRegistry {
    rooms: DashMap<RoomId, HashMap<ConnectionId, PeerInfo>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert. An existing record only has its display name replaced.
    ///
    /// `notify` runs while the room's shard lock is still held, so anything
    /// it queues is ordered against every other join or leave of that room.
    /// It must not call back into the registry.
    pub(crate) fn add_member<F>(&self, room_id: &RoomId, peer: PeerInfo, notify: F) -> MemberAdded
    where
        F: FnOnce(&MemberAdded),
    {
        let mut members = self.rooms.entry(room_id.clone()).or_default();
        let connection_id = peer.connection_id;

        let others = members
            .values()
            .filter(|member| member.connection_id != connection_id)
            .cloned()
            .collect();

        let newly_joined = match members.get_mut(&connection_id) {
            Some(existing) => {
                existing.display_name = peer.display_name;
                false
            }
            None => {
                members.insert(connection_id, peer);
                true
            }
        };

        let added = MemberAdded {
            newly_joined,
            others,
        };
        notify(&added);
        drop(members);

        added
    }

    /// No-op when the connection is not a member. Drops the room once empty.
    /// `notify` runs under the room's lock, as in `add_member`.
    pub(crate) fn remove_member<F>(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
        notify: F,
    ) -> Option<MemberRemoved>
    where
        F: FnOnce(&MemberRemoved),
    {
        let Entry::Occupied(mut entry) = self.rooms.entry(room_id.clone()) else {
            return None;
        };

        let member = entry.get_mut().remove(connection_id)?;
        let remaining: Vec<PeerInfo> = entry.get().values().cloned().collect();
        let removed = MemberRemoved { member, remaining };
        notify(&removed);

        if removed.remaining.is_empty() {
            entry.remove();
        }

        Some(removed)
    }

    pub fn list_members(&self, room_id: &RoomId) -> Vec<PeerInfo> {
        self.rooms
            .get(room_id)
            .map(|members| members.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn member(&self, room_id: &RoomId, connection_id: &ConnectionId) -> Option<PeerInfo> {
        self.rooms
            .get(room_id)
            .and_then(|members| members.get(connection_id).cloned())
    }

    pub fn is_member(&self, room_id: &RoomId, connection_id: &ConnectionId) -> bool {
        self.rooms
            .get(room_id)
            .is_some_and(|members| members.contains_key(connection_id))
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn member_count(&self, room_id: &RoomId) -> usize {
        self.rooms.get(room_id).map(|m| m.len()).unwrap_or(0)
    }

    /// Snapshot of (room, member count) pairs.
    pub fn occupancy(&self) -> Vec<(RoomId, usize)> {
        self.rooms
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().len()))
            .collect()
    }
}
