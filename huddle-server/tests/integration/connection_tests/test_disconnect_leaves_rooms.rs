use huddle_core::{RoomId, SignalEnvelope};

use crate::integration::{create_test_relay, init_tracing};
use crate::utils::TestPeer;

#[tokio::test]
async fn test_disconnect_removes_presence_and_notifies_room() {
    init_tracing();

    let relay = create_test_relay();
    let room = RoomId::from("r1");
    let mut alice = TestPeer::join(&relay, "alice");
    let mut bob = TestPeer::join(&relay, "bob");
    let carol = TestPeer::join(&relay, "carol");

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
    for peer in [&bob, &carol] {
        peer.send(
            &relay,
            SignalEnvelope::JoinRoom {
                room_id: room.clone(),
                user_id: peer.id.clone(),
                is_video: None,
            },
        )
        .unwrap();
    }
    alice.inbox();
    bob.inbox();

    let gone = relay.disconnect(carol.endpoint.id());

    assert_eq!(gone, vec!["carol".into()]);
    let notice = SignalEnvelope::LeaveRoom {
        room_id: room.clone(),
        user_id: "carol".into(),
    };
    assert_eq!(alice.inbox(), vec![notice.clone()]);
    assert_eq!(bob.inbox(), vec![notice]);
    assert!(relay.directory().lookup(&"carol".into()).is_none());
    assert_eq!(relay.rooms().members(&room).unwrap().len(), 2);

    // Counterparts find out on their next send.
    let result = alice.send(
        &relay,
        SignalEnvelope::End {
            to: "carol".into(),
            from: "alice".into(),
        },
    );
    assert!(result.is_err());
    assert_eq!(
        alice.inbox(),
        vec![SignalEnvelope::UserOffline {
            user_id: "carol".into()
        }]
    );
}
