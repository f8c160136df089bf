use crate::model::connection::ConnectionId;
use crate::model::room::RoomId;
use crate::model::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat line as stamped by the server. `id` and `timestamp` are authoritative.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub room_id: RoomId,
    pub connection_id: ConnectionId,
    pub user_id: UserId,
    pub display_name: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}
