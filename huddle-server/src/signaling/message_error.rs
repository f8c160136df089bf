use huddle_core::{ErrorCode, RoomId, ServerMessage};
use thiserror::Error;

/// Why an inbound frame was discarded. Reported to the sender only.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("Invalid message format: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Binary frames are not supported")]
    UnsupportedFrame,

    #[error("Message of {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },

    #[error("Chat message is empty")]
    EmptyChat,

    #[error("Chat message exceeds {limit} characters")]
    ChatTooLong { limit: usize },

    #[error("Not a member of room {0}")]
    NotInRoom(RoomId),
}

impl MessageError {
    pub fn code(&self) -> ErrorCode {
        match self {
            MessageError::Malformed(_) => ErrorCode::Malformed,
            MessageError::UnsupportedFrame => ErrorCode::UnsupportedFrame,
            MessageError::TooLarge { .. } => ErrorCode::MessageTooLarge,
            MessageError::EmptyChat | MessageError::ChatTooLong { .. } => ErrorCode::InvalidMessage,
            MessageError::NotInRoom(_) => ErrorCode::NotInRoom,
        }
    }

    pub fn to_server_message(&self) -> ServerMessage {
        ServerMessage::Error {
            code: self.code(),
            message: self.to_string(),
        }
    }
}
