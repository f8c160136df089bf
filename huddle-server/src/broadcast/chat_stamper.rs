use chrono::Utc;
use huddle_core::{ChatMessage, PeerInfo, RoomId};
use std::sync::atomic::{AtomicU64, Ordering};

/// Assigns the server-side id and timestamp to chat lines.
///
/// Ids are `<sender connection id>-<sequence>`; the sequence is shared by
/// every sender and only grows, so ids never repeat within a process.
#[derive(Default)]
pub struct ChatStamper {
    sequence: AtomicU64,
}

impl ChatStamper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stamp(&self, room_id: RoomId, sender: &PeerInfo, message: String) -> ChatMessage {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);

        ChatMessage {
            id: format!("{}-{}", sender.connection_id, seq),
            room_id,
            connection_id: sender.connection_id,
            user_id: sender.user_id.clone(),
            display_name: sender.display_name.clone(),
            message,
            timestamp: Utc::now(),
        }
    }
}
