use std::time::Duration;

use huddle_core::{ClientMessage, RoomId, ServerMessage};
use serde_json::json;

use crate::integration::{create_test_service, init_tracing};
use crate::utils::{
    WsStream, connect_ws, mint_token, next_server_message, send_client_message, spawn_server,
    wait_for_op,
};

async fn join(ws: &mut WsStream, room: &str, name: &str) {
    send_client_message(
        ws,
        &ClientMessage::Join {
            room_id: RoomId::from(room),
            display_name: name.into(),
        },
    )
    .await
    .expect("Send failed");
    wait_for_op(ws, "existing-peers").await.expect("No snapshot");
}

#[tokio::test]
async fn test_socket_close_releases_connection() {
    init_tracing();

    let service = create_test_service();
    let addr = spawn_server(service.clone()).await.expect("Server failed to start");

    let mut a = connect_ws(addr, Some(&mint_token("user-a"))).await.expect("Handshake A");
    let mut b = connect_ws(addr, Some(&mint_token("user-b"))).await.expect("Handshake B");

    join(&mut a, "x", "A").await;
    join(&mut b, "x", "B").await;

    let b_id = match wait_for_op(&mut a, "peer-joined").await.expect("No peer-joined") {
        ServerMessage::PeerJoined { peer, .. } => peer.connection_id,
        other => panic!("Expected PeerJoined, got {:?}", other),
    };

    b.close(None).await.expect("Close failed");

    match wait_for_op(&mut a, "peer-left").await.expect("No peer-left") {
        ServerMessage::PeerLeft { room_id, peer } => {
            assert_eq!(room_id, RoomId::from("x"));
            assert_eq!(peer.connection_id, b_id);
        }
        other => panic!("Expected PeerLeft, got {:?}", other),
    }

    for _ in 0..50 {
        if !service.is_connected(&b_id) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(!service.is_connected(&b_id));
    assert_eq!(service.registry().member_count(&RoomId::from("x")), 1);

    // A late offer to the departed peer is dropped without any reply.
    send_client_message(
        &mut a,
        &ClientMessage::Offer {
            target_connection_id: Some(b_id),
            payload: json!({"sdp": "v=0"}),
            from_connection_id: None,
        },
    )
    .await
    .expect("Send failed");
    assert!(next_server_message(&mut a).await.is_err());
}
