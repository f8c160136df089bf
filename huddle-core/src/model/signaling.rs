use crate::model::chat::ChatMessage;
use crate::model::connection::{ConnectionId, deserialize_target};
use crate::model::media::MediaType;
use crate::model::peer::PeerInfo;
use crate::model::room::RoomId;
use crate::model::user::UserId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

/// Frames a client may send once admitted.
///
/// `payload`, `event`, `state` and `file` are opaque: the server forwards
/// them without looking inside. `from_connection_id` is accepted for wire
/// compatibility but never trusted. A `target_connection_id` that is not a
/// valid id decodes as `None` and is relayed nowhere.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(
    tag = "op",
    content = "d",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ClientMessage {
    Join {
        room_id: RoomId,
        display_name: String,
    },
    Leave {
        room_id: RoomId,
    },
    Offer {
        #[serde(deserialize_with = "deserialize_target")]
        target_connection_id: Option<ConnectionId>,
        payload: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from_connection_id: Option<ConnectionId>,
    },
    Answer {
        #[serde(deserialize_with = "deserialize_target")]
        target_connection_id: Option<ConnectionId>,
        payload: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from_connection_id: Option<ConnectionId>,
    },
    IceCandidate {
        #[serde(deserialize_with = "deserialize_target")]
        target_connection_id: Option<ConnectionId>,
        payload: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from_connection_id: Option<ConnectionId>,
    },
    ScreenShare {
        room_id: RoomId,
        is_sharing: bool,
    },
    WhiteboardDraw {
        room_id: RoomId,
        event: Value,
    },
    WhiteboardClear {
        room_id: RoomId,
    },
    WhiteboardStateRequest {
        room_id: RoomId,
    },
    WhiteboardState {
        #[serde(deserialize_with = "deserialize_target")]
        target_connection_id: Option<ConnectionId>,
        state: Value,
    },
    Chat {
        room_id: RoomId,
        message: String,
    },
    MediaToggle {
        room_id: RoomId,
        media_type: MediaType,
        enabled: bool,
    },
    FileShared {
        room_id: RoomId,
        file: Value,
    },
}

impl ClientMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::Leave { .. } => "leave",
            Self::Offer { .. } => "offer",
            Self::Answer { .. } => "answer",
            Self::IceCandidate { .. } => "ice-candidate",
            Self::ScreenShare { .. } => "screen-share",
            Self::WhiteboardDraw { .. } => "whiteboard-draw",
            Self::WhiteboardClear { .. } => "whiteboard-clear",
            Self::WhiteboardStateRequest { .. } => "whiteboard-state-request",
            Self::WhiteboardState { .. } => "whiteboard-state",
            Self::Chat { .. } => "chat",
            Self::MediaToggle { .. } => "media-toggle",
            Self::FileShared { .. } => "file-shared",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    Malformed,
    UnsupportedFrame,
    MessageTooLarge,
    InvalidMessage,
    NotInRoom,
}

/// Frames the server writes to a connection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(
    tag = "op",
    content = "d",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ServerMessage {
    Welcome {
        connection_id: ConnectionId,
        user_id: UserId,
    },
    IceConfig {
        ice_servers: Vec<IceServerConfig>,
    },
    ExistingPeers {
        room_id: RoomId,
        peers: Vec<PeerInfo>,
    },
    PeerJoined {
        room_id: RoomId,
        #[serde(flatten)]
        peer: PeerInfo,
    },
    PeerLeft {
        room_id: RoomId,
        #[serde(flatten)]
        peer: PeerInfo,
    },
    /// Carries the caller's display name so the callee can label the
    /// incoming call before any `peer-joined` for it arrives.
    Offer {
        from_connection_id: ConnectionId,
        display_name: String,
        payload: Value,
    },
    Answer {
        from_connection_id: ConnectionId,
        payload: Value,
    },
    IceCandidate {
        from_connection_id: ConnectionId,
        payload: Value,
    },
    ScreenShare {
        room_id: RoomId,
        from_connection_id: ConnectionId,
        is_sharing: bool,
    },
    WhiteboardDraw {
        room_id: RoomId,
        from_connection_id: ConnectionId,
        event: Value,
    },
    WhiteboardClear {
        room_id: RoomId,
        from_connection_id: ConnectionId,
    },
    WhiteboardStateRequest {
        room_id: RoomId,
        requester_connection_id: ConnectionId,
    },
    WhiteboardState {
        from_connection_id: ConnectionId,
        state: Value,
    },
    Chat(ChatMessage),
    MediaToggle {
        room_id: RoomId,
        from_connection_id: ConnectionId,
        media_type: MediaType,
        enabled: bool,
    },
    FileShared {
        room_id: RoomId,
        from_connection_id: ConnectionId,
        display_name: String,
        file: Value,
    },
    Error {
        code: ErrorCode,
        message: String,
    },
}

impl ServerMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Welcome { .. } => "welcome",
            Self::IceConfig { .. } => "ice-config",
            Self::ExistingPeers { .. } => "existing-peers",
            Self::PeerJoined { .. } => "peer-joined",
            Self::PeerLeft { .. } => "peer-left",
            Self::Offer { .. } => "offer",
            Self::Answer { .. } => "answer",
            Self::IceCandidate { .. } => "ice-candidate",
            Self::ScreenShare { .. } => "screen-share",
            Self::WhiteboardDraw { .. } => "whiteboard-draw",
            Self::WhiteboardClear { .. } => "whiteboard-clear",
            Self::WhiteboardStateRequest { .. } => "whiteboard-state-request",
            Self::WhiteboardState { .. } => "whiteboard-state",
            Self::Chat(_) => "chat",
            Self::MediaToggle { .. } => "media-toggle",
            Self::FileShared { .. } => "file-shared",
            Self::Error { .. } => "error",
        }
    }
}
