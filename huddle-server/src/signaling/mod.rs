mod connection_table;
mod message_error;
mod relay;
mod signaling_service;
mod ws_handler;

pub use connection_table::*;
pub use message_error::*;
pub use relay::*;
pub use signaling_service::*;
pub use ws_handler::*;
