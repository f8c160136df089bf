use huddle_core::IceServerConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Runtime settings for the coordination server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: SocketAddr,
    /// HS256 secret shared with whoever issues session tokens.
    pub jwt_secret: String,
    pub max_chat_length: usize,
    pub max_display_name_length: usize,
    /// Upper bound for one inbound text frame. Whiteboard snapshots are the big ones.
    pub max_message_bytes: usize,
    pub ping_interval_secs: u64,
    pub idle_timeout_secs: u64,
    pub ice_servers: Vec<IceServerConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 5000)),
            jwt_secret: String::new(),
            max_chat_length: 1000,
            max_display_name_length: 64,
            max_message_bytes: 1024 * 1024,
            ping_interval_secs: 25,
            idle_timeout_secs: 60,
            ice_servers: vec![IceServerConfig {
                urls: vec!["stun:stun.l.google.com:19302".to_owned()],
                username: None,
                credential: None,
            }],
        }
    }
}

impl ServerConfig {
    /// Read a TOML file. Keys that are absent keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::Invalid("jwt_secret must be set".into()));
        }
        if self.max_chat_length == 0 {
            return Err(ConfigError::Invalid("max_chat_length must be > 0".into()));
        }
        if self.max_display_name_length == 0 {
            return Err(ConfigError::Invalid(
                "max_display_name_length must be > 0".into(),
            ));
        }
        if self.max_message_bytes == 0 {
            return Err(ConfigError::Invalid("max_message_bytes must be > 0".into()));
        }
        if self.ping_interval_secs == 0 || self.idle_timeout_secs <= self.ping_interval_secs {
            return Err(ConfigError::Invalid(
                "idle_timeout_secs must exceed a non-zero ping_interval_secs".into(),
            ));
        }
        Ok(())
    }

    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Commented template printed by `huddle config`.
    pub fn template() -> &'static str {
        r#"# huddle coordination server

# Address the WebSocket gateway listens on.
bind_address = "0.0.0.0:5000"

# Shared HS256 secret used to verify session tokens. Required.
jwt_secret = ""

# Chat messages longer than this many characters are rejected.
max_chat_length = 1000

# Display names are truncated to this many characters.
max_display_name_length = 64

# Largest accepted inbound frame, in bytes.
max_message_bytes = 1048576

# Keepalive: ping every N seconds, drop the connection after M idle seconds.
ping_interval_secs = 25
idle_timeout_secs = 60

# Sent to every client right after it is admitted.
[[ice_servers]]
urls = ["stun:stun.l.google.com:19302"]
"#
    }
}
