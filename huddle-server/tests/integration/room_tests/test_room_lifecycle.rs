use huddle_core::{RoomId, SignalEnvelope};
use serde_json::json;

use crate::integration::{create_test_relay, init_tracing};
use crate::utils::TestPeer;

fn join_room(room_id: &RoomId, user: &str) -> SignalEnvelope {
    SignalEnvelope::JoinRoom {
        room_id: room_id.clone(),
        user_id: user.into(),
        is_video: Some(true),
    }
}

#[tokio::test]
async fn test_room_invite_join_signal_and_leave() {
    init_tracing();

    let relay = create_test_relay();
    let room = RoomId::from("standup");
    let mut alice = TestPeer::join(&relay, "alice");
    let mut bob = TestPeer::join(&relay, "bob");
    let mut carol = TestPeer::join(&relay, "carol");

    alice
        .send(
            &relay,
            SignalEnvelope::CreateRoom {
                room_id: room.clone(),
                creator: "alice".into(),
                target: "bob".into(),
                is_video: true,
            },
        )
        .expect("room created");
    assert_eq!(
        bob.inbox(),
        vec![SignalEnvelope::AddParticipant {
            room_id: room.clone(),
            from: "alice".into(),
            target: "bob".into(),
            is_video: true,
        }]
    );

    assert_eq!(bob.send(&relay, join_room(&room, "bob")), Ok(1));
    assert_eq!(alice.inbox(), vec![join_room(&room, "bob")]);

    // Any member may invite.
    bob.send(
        &relay,
        SignalEnvelope::AddParticipant {
            room_id: room.clone(),
            from: "bob".into(),
            target: "carol".into(),
            is_video: true,
        },
    )
    .expect("invite routed");
    assert_eq!(carol.inbox().len(), 1);

    // The newcomer is announced to both existing members, not to itself.
    assert_eq!(carol.send(&relay, join_room(&room, "carol")), Ok(2));
    assert_eq!(alice.inbox(), vec![join_room(&room, "carol")]);
    assert_eq!(bob.inbox(), vec![join_room(&room, "carol")]);
    assert!(carol.inbox().is_empty());

    let signal = SignalEnvelope::RoomSignal {
        room_id: room.clone(),
        from: "carol".into(),
        signal: json!({"muted": true}),
    };
    assert_eq!(carol.send(&relay, signal.clone()), Ok(2));
    assert_eq!(alice.inbox(), vec![signal.clone()]);
    assert_eq!(bob.inbox(), vec![signal]);

    let leave = SignalEnvelope::LeaveRoom {
        room_id: room.clone(),
        user_id: "bob".into(),
    };
    assert_eq!(bob.send(&relay, leave.clone()), Ok(2));
    assert_eq!(alice.inbox(), vec![leave.clone()]);
    assert_eq!(carol.inbox(), vec![leave]);

    let mut members = relay.rooms().members(&room).unwrap();
    members.sort();
    assert_eq!(members, vec!["alice".into(), "carol".into()]);
}

#[tokio::test]
async fn test_room_evicted_when_last_member_leaves() {
    init_tracing();

    let relay = create_test_relay();
    let room = RoomId::from("r1");
    let alice = TestPeer::join(&relay, "alice");
    let _bob = TestPeer::join(&relay, "bob");

    alice
        .send(
            &relay,
            SignalEnvelope::CreateRoom {
                room_id: room.clone(),
                creator: "alice".into(),
                target: "bob".into(),
                is_video: false,
            },
        )
        .unwrap();
    assert!(relay.rooms().contains(&room));

    alice
        .send(
            &relay,
            SignalEnvelope::LeaveRoom {
                room_id: room.clone(),
                user_id: "alice".into(),
            },
        )
        .unwrap();

    assert!(!relay.rooms().contains(&room));
}
