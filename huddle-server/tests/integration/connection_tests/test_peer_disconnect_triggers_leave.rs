use huddle_core::{RoomId, ServerMessage};

use crate::integration::{create_test_service, init_tracing};
use crate::utils::TestPeer;

fn peer_left_rooms(messages: Vec<ServerMessage>, who: huddle_core::ConnectionId) -> Vec<RoomId> {
    messages
        .into_iter()
        .filter_map(|m| match m {
            ServerMessage::PeerLeft { room_id, peer } if peer.connection_id == who => {
                Some(room_id)
            }
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_peer_disconnect_triggers_leave() {
    init_tracing();

    let service = create_test_service();
    let r1 = RoomId::from("r1");
    let r2 = RoomId::from("r2");

    let mut c = TestPeer::connect(&service, "user-c");
    let mut in_r1 = TestPeer::connect(&service, "user-1");
    let mut in_r2 = TestPeer::connect(&service, "user-2");
    let mut in_both = TestPeer::connect(&service, "user-3");

    in_r1.join(&service, "r1", "One");
    in_r2.join(&service, "r2", "Two");
    in_both.join(&service, "r1", "Three");
    in_both.join(&service, "r2", "Three");
    c.join(&service, "r1", "C");
    c.join(&service, "r2", "C");

    in_r1.drain();
    in_r2.drain();
    in_both.drain();

    let c_id = c.id();
    c.disconnect(&service);

    assert!(!service.registry().is_member(&r1, &c_id));
    assert!(!service.registry().is_member(&r2, &c_id));
    assert!(!service.is_connected(&c_id));

    assert_eq!(peer_left_rooms(in_r1.drain(), c_id), vec![r1.clone()]);
    assert_eq!(peer_left_rooms(in_r2.drain(), c_id), vec![r2.clone()]);

    let mut both = peer_left_rooms(in_both.drain(), c_id);
    both.sort();
    assert_eq!(both, vec![r1, r2]);
}

#[tokio::test]
async fn test_disconnect_after_explicit_leave_does_not_repeat() {
    init_tracing();

    let service = create_test_service();
    let mut c = TestPeer::connect(&service, "user-c");
    let mut other = TestPeer::connect(&service, "user-o");

    other.join(&service, "x", "Other");
    c.join(&service, "x", "C");
    other.drain();

    let c_id = c.id();
    c.leave(&service, "x");
    c.disconnect(&service);

    assert_eq!(peer_left_rooms(other.drain(), c_id), vec![RoomId::from("x")]);
    assert_eq!(service.registry().member_count(&RoomId::from("x")), 1);
}
