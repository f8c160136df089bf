use crate::signaling::ConnectionTable;
use huddle_core::{ConnectionId, ServerMessage};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalKind {
    /// Call setup. The caller's display name travels with it.
    Offer { display_name: String },
    Answer,
    IceCandidate,
    /// Whiteboard snapshot sent back to whoever asked for it.
    WhiteboardState,
}

/// A directed message. Lives for one relay call.
#[derive(Debug, Clone)]
pub struct SignalEnvelope {
    pub kind: SignalKind,
    pub target: ConnectionId,
    pub payload: Value,
}

impl SignalEnvelope {
    fn into_message(self, from_connection_id: ConnectionId) -> ServerMessage {
        let payload = self.payload;
        match self.kind {
            SignalKind::Offer { display_name } => ServerMessage::Offer {
                from_connection_id,
                display_name,
                payload,
            },
            SignalKind::Answer => ServerMessage::Answer {
                from_connection_id,
                payload,
            },
            SignalKind::IceCandidate => ServerMessage::IceCandidate {
                from_connection_id,
                payload,
            },
            SignalKind::WhiteboardState => ServerMessage::WhiteboardState {
                from_connection_id,
                state: payload,
            },
        }
    }
}

/// One-to-one forwarding between live connections.
#[derive(Clone)]
pub struct SignalingRelay {
    connections: Arc<ConnectionTable>,
}

impl SignalingRelay {
    pub fn new(connections: Arc<ConnectionTable>) -> Self {
        Self { connections }
    }

    /// Forwards `envelope` stamped with `source`. A target that is not live
    /// is a silent miss: signaling for a departed peer is worthless.
    pub fn relay(&self, source: ConnectionId, envelope: SignalEnvelope) -> bool {
        let target = envelope.target;
        let message = envelope.into_message(source);
        let kind = message.kind();
        let delivered = self.connections.deliver(&target, message);

        debug!(
            from = %source,
            to = %target,
            kind,
            delivered,
            "Relayed signal"
        );
        delivered
    }
}
