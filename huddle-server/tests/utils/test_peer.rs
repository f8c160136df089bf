use huddle_core::{ClientMessage, ConnectionId, RoomId, ServerMessage, UserId};
use huddle_server::{Connection, MessageError, SignalingService};
use tokio::sync::mpsc;

/// A connection driven straight through the service, with its outbound
/// queue exposed for assertions. No network involved.
pub struct TestPeer {
    pub connection: Connection,
    rx: mpsc::UnboundedReceiver<ServerMessage>,
}

impl TestPeer {
    /// Admits `user` and swallows the `welcome` / `ice-config` greeting.
    pub fn connect(service: &SignalingService, user: &str) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let connection = service.connect(UserId::from(user), tx);
        let mut peer = Self { connection, rx };

        let greeting = peer.drain();
        assert!(
            matches!(
                greeting.as_slice(),
                [ServerMessage::Welcome { .. }, ServerMessage::IceConfig { .. }]
            ),
            "Unexpected greeting: {:?}",
            greeting
        );
        peer
    }

    pub fn id(&self) -> ConnectionId {
        self.connection.id()
    }

    pub fn send(
        &mut self,
        service: &SignalingService,
        message: ClientMessage,
    ) -> Result<(), MessageError> {
        service.handle_message(&mut self.connection, message)
    }

    pub fn join(&mut self, service: &SignalingService, room: &str, display_name: &str) {
        self.send(
            service,
            ClientMessage::Join {
                room_id: RoomId::from(room),
                display_name: display_name.to_string(),
            },
        )
        .expect("join never fails");
    }

    pub fn leave(&mut self, service: &SignalingService, room: &str) {
        self.send(
            service,
            ClientMessage::Leave {
                room_id: RoomId::from(room),
            },
        )
        .expect("leave never fails");
    }

    pub fn disconnect(self, service: &SignalingService) {
        service.disconnect(self.connection);
    }

    /// Everything queued so far, in delivery order.
    pub fn drain(&mut self) -> Vec<ServerMessage> {
        let mut out = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            out.push(msg);
        }
        out
    }
}
