use crate::auth::{AuthError, Authenticator, JwtAuthenticator};
use crate::broadcast::{ChatStamper, Fanout};
use crate::config::ServerConfig;
use crate::room::{Connection, PeerLifecycle, RoomRegistry};
use crate::signaling::{ConnectionTable, MessageError, SignalEnvelope, SignalKind, SignalingRelay};
use huddle_core::{ClientMessage, ConnectionId, RoomId, ServerMessage, UserId};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

struct SignalingInner {
    config: ServerConfig,
    authenticator: Arc<dyn Authenticator>,
    connections: Arc<ConnectionTable>,
    registry: Arc<RoomRegistry>,
    fanout: Fanout,
    relay: SignalingRelay,
    lifecycle: PeerLifecycle,
    stamper: ChatStamper,
}

/// Entry point of the coordination core. Cheap to clone; every clone
/// shares the same registry and live-connection table.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
}

impl SignalingService {
    pub fn new(config: ServerConfig, authenticator: Arc<dyn Authenticator>) -> Self {
        let connections = Arc::new(ConnectionTable::new());
        let registry = Arc::new(RoomRegistry::new());
        let fanout = Fanout::new(registry.clone(), connections.clone());

        Self {
            inner: Arc::new(SignalingInner {
                config,
                authenticator,
                relay: SignalingRelay::new(connections.clone()),
                lifecycle: PeerLifecycle::new(registry.clone(), fanout.clone()),
                stamper: ChatStamper::new(),
                connections,
                registry,
                fanout,
            }),
        }
    }

    /// Service that verifies HS256 session tokens with `config.jwt_secret`.
    pub fn with_jwt(config: ServerConfig) -> Self {
        let authenticator = Arc::new(JwtAuthenticator::new(config.jwt_secret.as_bytes()));
        Self::new(config, authenticator)
    }

    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.inner.registry
    }

    pub fn connection_count(&self) -> usize {
        self.inner.connections.len()
    }

    pub fn is_connected(&self, id: &ConnectionId) -> bool {
        self.inner.connections.contains(id)
    }

    pub async fn authenticate(&self, credential: &str) -> Result<UserId, AuthError> {
        self.inner.authenticator.verify(credential).await
    }

    /// Admits an authenticated user. Queues `welcome` and `ice-config` on
    /// `outbound` before anything else can reach it.
    pub fn connect(
        &self,
        user_id: UserId,
        outbound: mpsc::UnboundedSender<ServerMessage>,
    ) -> Connection {
        let id = ConnectionId::new();
        self.inner.connections.register(id, user_id.clone(), outbound);

        self.inner.connections.deliver(
            &id,
            ServerMessage::Welcome {
                connection_id: id,
                user_id: user_id.clone(),
            },
        );
        self.inner.connections.deliver(
            &id,
            ServerMessage::IceConfig {
                ice_servers: self.inner.config.ice_servers.clone(),
            },
        );

        info!(connection_id = %id, user_id = %user_id, "Connection admitted");
        Connection::new(id, user_id)
    }

    /// Leaves every joined room, then forgets the connection so later relays miss it.
    pub fn disconnect(&self, connection: Connection) {
        let id = connection.id();
        self.inner.lifecycle.disconnect_cleanup(connection);
        self.inner.connections.unregister(&id);

        info!(connection_id = %id, "Connection released");
    }

    /// Parses and dispatches one text frame.
    pub fn handle_text(&self, connection: &mut Connection, text: &str) -> Result<(), MessageError> {
        let limit = self.inner.config.max_message_bytes;
        if text.len() > limit {
            return Err(MessageError::TooLarge {
                size: text.len(),
                limit,
            });
        }

        let message: ClientMessage = serde_json::from_str(text)?;
        self.handle_message(connection, message)
    }

    /// Tells the offending connection why its frame was dropped.
    pub fn report_error(&self, connection: &Connection, error: &MessageError) {
        warn!(connection_id = %connection.id(), error = %error, "Discarding inbound message");
        self.inner
            .connections
            .deliver(&connection.id(), error.to_server_message());
    }

    pub fn handle_message(
        &self,
        connection: &mut Connection,
        message: ClientMessage,
    ) -> Result<(), MessageError> {
        let from = connection.id();
        debug!(connection_id = %from, kind = message.kind(), "Inbound message");

        match message {
            ClientMessage::Join {
                room_id,
                display_name,
            } => {
                let display_name = self.normalize_display_name(connection, display_name);
                self.inner.lifecycle.join(connection, room_id, display_name);
            }

            ClientMessage::Leave { room_id } => {
                self.inner.lifecycle.leave(connection, &room_id);
            }

            ClientMessage::Offer {
                target_connection_id,
                payload,
                ..
            } => {
                let display_name = self.display_name_of(connection);
                self.relay(
                    from,
                    SignalKind::Offer { display_name },
                    target_connection_id,
                    payload,
                )
            }

            ClientMessage::Answer {
                target_connection_id,
                payload,
                ..
            } => self.relay(from, SignalKind::Answer, target_connection_id, payload),

            ClientMessage::IceCandidate {
                target_connection_id,
                payload,
                ..
            } => self.relay(from, SignalKind::IceCandidate, target_connection_id, payload),

            ClientMessage::WhiteboardState {
                target_connection_id,
                state,
            } => self.relay(from, SignalKind::WhiteboardState, target_connection_id, state),

            ClientMessage::ScreenShare {
                room_id,
                is_sharing,
            } => {
                require_member(connection, &room_id)?;
                let event = ServerMessage::ScreenShare {
                    room_id: room_id.clone(),
                    from_connection_id: from,
                    is_sharing,
                };
                self.inner.fanout.broadcast(&room_id, event, Some(from));
            }

            ClientMessage::WhiteboardDraw { room_id, event } => {
                require_member(connection, &room_id)?;
                let event = ServerMessage::WhiteboardDraw {
                    room_id: room_id.clone(),
                    from_connection_id: from,
                    event,
                };
                self.inner.fanout.broadcast(&room_id, event, Some(from));
            }

            ClientMessage::WhiteboardClear { room_id } => {
                require_member(connection, &room_id)?;
                let event = ServerMessage::WhiteboardClear {
                    room_id: room_id.clone(),
                    from_connection_id: from,
                };
                self.inner.fanout.broadcast(&room_id, event, Some(from));
            }

            ClientMessage::WhiteboardStateRequest { room_id } => {
                require_member(connection, &room_id)?;
                let event = ServerMessage::WhiteboardStateRequest {
                    room_id: room_id.clone(),
                    requester_connection_id: from,
                };
                self.inner.fanout.broadcast(&room_id, event, Some(from));
            }

            ClientMessage::Chat { room_id, message } => {
                require_member(connection, &room_id)?;
                let text = self.validate_chat(message)?;
                let sender = self
                    .inner
                    .registry
                    .member(&room_id, &from)
                    .ok_or_else(|| MessageError::NotInRoom(room_id.clone()))?;

                let stamped = self.inner.stamper.stamp(room_id.clone(), &sender, text);
                self.inner
                    .fanout
                    .broadcast(&room_id, ServerMessage::Chat(stamped), None);
            }

            ClientMessage::MediaToggle {
                room_id,
                media_type,
                enabled,
            } => {
                require_member(connection, &room_id)?;
                let event = ServerMessage::MediaToggle {
                    room_id: room_id.clone(),
                    from_connection_id: from,
                    media_type,
                    enabled,
                };
                self.inner.fanout.broadcast(&room_id, event, Some(from));
            }

            ClientMessage::FileShared { room_id, file } => {
                require_member(connection, &room_id)?;
                let display_name = self
                    .inner
                    .registry
                    .member(&room_id, &from)
                    .map(|peer| peer.display_name)
                    .unwrap_or_else(|| connection.user_id().to_string());
                let event = ServerMessage::FileShared {
                    room_id: room_id.clone(),
                    from_connection_id: from,
                    display_name,
                    file,
                };
                self.inner.fanout.broadcast(&room_id, event, Some(from));
            }
        }

        Ok(())
    }

    /// A target that did not decode to a connection id takes the same
    /// silent-miss path as one that is no longer live.
    fn relay(
        &self,
        from: ConnectionId,
        kind: SignalKind,
        target: Option<ConnectionId>,
        payload: serde_json::Value,
    ) {
        let Some(target) = target else {
            debug!(from = %from, kind = ?kind, "Dropping signal with unusable target");
            return;
        };

        self.inner.relay.relay(
            from,
            SignalEnvelope {
                kind,
                target,
                payload,
            },
        );
    }

    /// Display name from any room the connection is in, else its user id.
    fn display_name_of(&self, connection: &Connection) -> String {
        connection
            .rooms()
            .find_map(|room_id| self.inner.registry.member(room_id, &connection.id()))
            .map(|peer| peer.display_name)
            .unwrap_or_else(|| connection.user_id().to_string())
    }

    fn normalize_display_name(&self, connection: &Connection, display_name: String) -> String {
        let trimmed = display_name.trim();
        if trimmed.is_empty() {
            return connection.user_id().to_string();
        }
        trimmed
            .chars()
            .take(self.inner.config.max_display_name_length)
            .collect()
    }

    fn validate_chat(&self, message: String) -> Result<String, MessageError> {
        let trimmed = message.trim();
        if trimmed.is_empty() {
            return Err(MessageError::EmptyChat);
        }

        let limit = self.inner.config.max_chat_length;
        if trimmed.chars().count() > limit {
            return Err(MessageError::ChatTooLong { limit });
        }
        Ok(trimmed.to_owned())
    }
}

fn require_member(connection: &Connection, room_id: &RoomId) -> Result<(), MessageError> {
    if connection.is_in(room_id) {
        Ok(())
    } else {
        Err(MessageError::NotInRoom(room_id.clone()))
    }
}
