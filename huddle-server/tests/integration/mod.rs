
use tracing::Level;

use huddle_server::{ServerConfig, SignalingService};

use crate::utils::TEST_SECRET;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn test_config() -> ServerConfig {
    ServerConfig {
        jwt_secret: TEST_SECRET.to_string(),
        ..ServerConfig::default()
    }
}

pub fn create_test_service() -> SignalingService {
    SignalingService::with_jwt(test_config())
}
