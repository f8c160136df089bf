mod chat;
mod connection;
mod media;
mod peer;
mod room;
mod signaling;
mod user;

pub use chat::ChatMessage;
pub use connection::ConnectionId;
pub use media::MediaType;
pub use peer::PeerInfo;
pub use room::RoomId;
pub use signaling::{ClientMessage, ErrorCode, IceServerConfig, ServerMessage};
pub use user::UserId;
