use std::collections::HashSet;
use std::sync::Barrier;
use std::thread;

use huddle_core::{ConnectionId, RoomId, ServerMessage};
use huddle_server::SignalingService;

use crate::integration::{create_test_service, init_tracing};
use crate::utils::TestPeer;

const ROUNDS: usize = 2000;

/// Rebuilds a member's picture of `room` from what it was told, starting
/// from what it already knew.
fn replay_view(
    mut view: HashSet<ConnectionId>,
    messages: Vec<ServerMessage>,
    room: &RoomId,
) -> HashSet<ConnectionId> {
    for message in messages {
        match message {
            ServerMessage::ExistingPeers { room_id, peers } if &room_id == room => {
                view = peers.into_iter().map(|peer| peer.connection_id).collect();
            }
            ServerMessage::PeerJoined { room_id, peer } if &room_id == room => {
                view.insert(peer.connection_id);
            }
            ServerMessage::PeerLeft { room_id, peer } if &room_id == room => {
                view.remove(&peer.connection_id);
            }
            _ => {}
        }
    }
    view
}

fn registry_view(service: &SignalingService, room: &RoomId, me: ConnectionId) -> HashSet<ConnectionId> {
    service
        .registry()
        .list_members(room)
        .into_iter()
        .map(|peer| peer.connection_id)
        .filter(|id| *id != me)
        .collect()
}

#[test]
fn test_joiner_never_keeps_a_departed_peer() {
    init_tracing();

    let service = create_test_service();

    for round in 0..ROUNDS {
        let room_name = format!("race-{round}");
        let room = RoomId::from(room_name.as_str());

        let mut a = TestPeer::connect(&service, "user-a");
        let mut b = TestPeer::connect(&service, "user-b");
        a.join(&service, &room_name, "A");

        let barrier = Barrier::new(2);
        thread::scope(|scope| {
            scope.spawn(|| {
                barrier.wait();
                a.leave(&service, &room_name);
            });
            scope.spawn(|| {
                barrier.wait();
                b.join(&service, &room_name, "B");
            });
        });

        let seen = replay_view(HashSet::new(), b.drain(), &room);
        assert_eq!(
            seen,
            registry_view(&service, &room, b.id()),
            "Joiner view diverged from the registry in round {round}"
        );
        assert!(!seen.contains(&a.id()));

        a.disconnect(&service);
        b.disconnect(&service);
    }

    assert_eq!(service.registry().room_count(), 0);
}

#[test]
fn test_joiner_view_survives_racing_disconnect() {
    init_tracing();

    let service = create_test_service();

    for round in 0..ROUNDS {
        let room_name = format!("drop-{round}");
        let room = RoomId::from(room_name.as_str());

        let mut a = TestPeer::connect(&service, "user-a");
        let mut b = TestPeer::connect(&service, "user-b");
        let mut c = TestPeer::connect(&service, "user-c");
        a.join(&service, &room_name, "A");
        c.join(&service, &room_name, "C");
        c.drain();
        let a_id = a.id();

        let barrier = Barrier::new(2);
        thread::scope(|scope| {
            let service = &service;
            let barrier = &barrier;
            scope.spawn(move || {
                barrier.wait();
                a.disconnect(service);
            });
            scope.spawn(|| {
                barrier.wait();
                b.join(service, &room_name, "B");
            });
        });

        assert_eq!(
            replay_view(HashSet::new(), b.drain(), &room),
            registry_view(&service, &room, b.id()),
            "Joiner view diverged from the registry in round {round}"
        );
        assert_eq!(
            replay_view(HashSet::from([a_id]), c.drain(), &room),
            registry_view(&service, &room, c.id()),
            "Bystander view diverged from the registry in round {round}"
        );

        b.disconnect(&service);
        c.disconnect(&service);
    }
}
