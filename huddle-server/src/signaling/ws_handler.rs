use crate::auth::{AuthError, CredentialQuery, extract_credential};
use crate::room::Connection;
use crate::signaling::{MessageError, SignalingService};
use axum::extract::ws::{CloseFrame, Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::body::Bytes;
use axum::http::HeaderMap;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use huddle_core::{ServerMessage, UserId};
use tokio::sync::mpsc;
use tokio::time::{interval, timeout};
use tracing::{debug, error, info, warn};

/// `GET /ws` upgrade. The credential is checked before the socket does
/// anything; a refused socket is closed with a 4xxx code and never admitted.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<CredentialQuery>,
    headers: HeaderMap,
    State(service): State<SignalingService>,
) -> Response {
    let verdict = match extract_credential(&query, &headers) {
        Ok(credential) => service.authenticate(&credential).await,
        Err(e) => Err(e),
    };

    match verdict {
        Ok(user_id) => {
            // Oversized frames are refused by the transport before they are buffered.
            let limit = service.config().max_message_bytes;
            ws.max_message_size(limit)
                .max_frame_size(limit)
                .on_upgrade(move |socket| handle_socket(socket, user_id, service))
        }
        Err(err) => {
            warn!(error = %err, close_code = err.close_code(), "WebSocket authentication failed");
            ws.on_upgrade(move |socket| refuse(socket, err))
        }
    }
}

async fn refuse(mut socket: WebSocket, err: AuthError) {
    let frame = CloseFrame {
        code: err.close_code(),
        reason: err.to_string().into(),
    };
    let _ = socket.send(Message::Close(Some(frame))).await;
}

async fn handle_socket(socket: WebSocket, user_id: UserId, service: SignalingService) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    let mut connection = service.connect(user_id, tx);
    let connection_id = connection.id();
    let ping_every = service.config().ping_interval();
    let idle_timeout = service.config().idle_timeout();

    let mut send_task = tokio::spawn(async move {
        let mut ping = interval(ping_every);
        ping.tick().await;

        loop {
            tokio::select! {
                msg = rx.recv() => {
                    let Some(msg) = msg else { break };
                    match serde_json::to_string(&msg) {
                        Ok(json) => {
                            if sender.send(Message::Text(json.into())).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => error!("Failed to serialize {} message: {}", msg.kind(), e),
                    }
                }
                _ = ping.tick() => {
                    if sender.send(Message::Ping(Bytes::new())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    loop {
        tokio::select! {
            frame = timeout(idle_timeout, receiver.next()) => match frame {
                Ok(Some(Ok(msg))) => {
                    if !handle_frame(&service, &mut connection, msg) {
                        break;
                    }
                }
                Ok(Some(Err(e))) => {
                    debug!(connection_id = %connection_id, error = %e, "WebSocket receive error");
                    break;
                }
                Ok(None) => break,
                Err(_) => {
                    info!(connection_id = %connection_id, "Idle timeout, closing connection");
                    break;
                }
            },
            _ = &mut send_task => {
                debug!(connection_id = %connection_id, "Writer stopped");
                break;
            }
        }
    }

    send_task.abort();
    service.disconnect(connection);
    info!("WebSocket disconnected: {}", connection_id);
}

/// Returns false once the connection should be torn down.
fn handle_frame(service: &SignalingService, connection: &mut Connection, msg: Message) -> bool {
    match msg {
        Message::Text(text) => {
            if let Err(e) = service.handle_text(connection, text.as_str()) {
                service.report_error(connection, &e);
            }
            true
        }
        Message::Binary(_) => {
            service.report_error(connection, &MessageError::UnsupportedFrame);
            true
        }
        Message::Ping(_) | Message::Pong(_) => true,
        Message::Close(_) => false,
    }
}
