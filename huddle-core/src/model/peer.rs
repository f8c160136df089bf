use crate::model::connection::ConnectionId;
use crate::model::user::UserId;
use serde::{Deserialize, Serialize};

/// One member of a room as other members see it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PeerInfo {
    pub connection_id: ConnectionId,
    pub user_id: UserId,
    pub display_name: String,
}
