mod app;
pub mod auth;
pub mod broadcast;
pub mod config;
pub mod room;
pub mod signaling;

pub use app::*;
pub use auth::{AuthError, Authenticator, JwtAuthenticator};
pub use broadcast::{ChatStamper, Fanout};
pub use config::{ConfigError, ServerConfig};
pub use room::{Connection, PeerLifecycle, RoomRegistry};
pub use signaling::*;
