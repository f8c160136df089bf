use huddle_core::{ClientMessage, MediaType, RoomId, ServerMessage};
use serde_json::json;

use crate::integration::{create_test_service, init_tracing};
use crate::utils::TestPeer;

#[tokio::test]
async fn test_room_events_skip_sender() {
    init_tracing();

    let service = create_test_service();
    let room = RoomId::from("design-review");
    let mut a = TestPeer::connect(&service, "user-a");
    let mut b = TestPeer::connect(&service, "user-b");
    let mut c = TestPeer::connect(&service, "user-c");

    for (peer, name) in [(&mut a, "A"), (&mut b, "B"), (&mut c, "C")] {
        peer.join(&service, "design-review", name);
    }
    for peer in [&mut a, &mut b, &mut c] {
        peer.drain();
    }

    let events = vec![
        ClientMessage::WhiteboardDraw {
            room_id: room.clone(),
            event: json!({"x0": 0, "y0": 0, "x1": 10, "y1": 10, "color": "#000"}),
        },
        ClientMessage::WhiteboardClear {
            room_id: room.clone(),
        },
        ClientMessage::MediaToggle {
            room_id: room.clone(),
            media_type: MediaType::Audio,
            enabled: false,
        },
        ClientMessage::ScreenShare {
            room_id: room.clone(),
            is_sharing: true,
        },
        ClientMessage::FileShared {
            room_id: room.clone(),
            file: json!({"name": "notes.pdf", "size": 1024}),
        },
    ];
    for event in events {
        a.send(&service, event).expect("Event rejected");
    }

    assert!(a.drain().is_empty());

    for peer in [&mut b, &mut c] {
        let received = peer.drain();
        let kinds: Vec<&str> = received.iter().map(|m| m.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                "whiteboard-draw",
                "whiteboard-clear",
                "media-toggle",
                "screen-share",
                "file-shared"
            ]
        );

        match &received[2] {
            ServerMessage::MediaToggle {
                from_connection_id,
                media_type,
                enabled,
                ..
            } => {
                assert_eq!(*from_connection_id, a.id());
                assert_eq!(*media_type, MediaType::Audio);
                assert!(!enabled);
            }
            other => panic!("Expected MediaToggle, got {:?}", other),
        }

        match &received[4] {
            ServerMessage::FileShared { display_name, .. } => assert_eq!(display_name, "A"),
            other => panic!("Expected FileShared, got {:?}", other),
        }
    }
}
