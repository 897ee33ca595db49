use crate::integration::init_tracing;
use crate::integration::room_tests::build_mesh;
use crate::utils::{TestNetwork, participant};
use huddle_client::CallEvent;
use serde_json::json;

#[tokio::test]
async fn test_room_signal_reaches_other_members() {
    init_tracing();
    let mut net = TestNetwork::new();
    let room_id = build_mesh(&mut net).await;
    for id in ["alice", "bob", "carol"] {
        net.node(id).events();
    }

    net.agent("bob")
        .send_room_signal(&room_id, json!({"muted": true}))
        .unwrap();
    net.settle().await;

    let expected = CallEvent::RoomSignal {
        room_id: room_id.clone(),
        from: participant("bob"),
        signal: json!({"muted": true}),
    };
    assert_eq!(net.node("alice").events(), vec![expected.clone()]);
    assert_eq!(net.node("carol").events(), vec![expected]);
    assert!(net.node("bob").events().is_empty());
}

#[tokio::test]
async fn test_room_signal_requires_membership() {
    init_tracing();
    let mut net = TestNetwork::new();
    let _ = build_mesh(&mut net).await;

    let result = net
        .agent("alice")
        .send_room_signal(&"elsewhere".into(), json!({}));
    assert!(result.is_err());
}
