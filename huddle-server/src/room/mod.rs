mod connection;
mod peer_lifecycle;
mod room_registry;

pub use connection::*;
pub use peer_lifecycle::*;
pub use room_registry::*;
