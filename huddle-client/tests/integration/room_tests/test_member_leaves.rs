use crate::integration::init_tracing;
use crate::integration::room_tests::build_mesh;
use crate::utils::{EngineCall, TestNetwork, participant};
use huddle_client::{CallEvent, NegotiationState, PeerSession};

#[tokio::test]
async fn test_leaving_member_is_dropped_from_mesh() {
    init_tracing();
    let mut net = TestNetwork::new();
    let room_id = build_mesh(&mut net).await;
    for id in ["alice", "bob"] {
        net.node(id).events();
    }

    net.agent("carol").leave_room(&room_id).await.unwrap();
    net.settle().await;

    assert!(net.agent("carol").sessions().next().is_none());
    assert!(net.agent("carol").room(&room_id).is_none());
    assert_eq!(
        net.node("carol").engine.calls().await.last(),
        Some(&EngineCall::Release)
    );

    for (me, other) in [("alice", "bob"), ("bob", "alice")] {
        assert!(net.agent(me).session(&participant("carol")).is_none());
        assert!(net.node(me).engine.closed("carol").await);
        assert_eq!(
            net.agent(me).session(&participant(other)).map(PeerSession::state),
            Some(NegotiationState::DescriptionExchanged)
        );
        assert!(net.node(me).events().contains(&CallEvent::ParticipantLeft {
            room_id: room_id.clone(),
            participant: participant("carol"),
        }));
    }
}

#[tokio::test]
async fn test_disconnect_is_treated_as_leave() {
    init_tracing();
    let mut net = TestNetwork::new();
    let room_id = build_mesh(&mut net).await;

    net.disconnect("carol").await;

    for me in ["alice", "bob"] {
        assert!(net.agent(me).session(&participant("carol")).is_none());
        assert_eq!(net.agent(me).sessions().count(), 1);
        assert!(
            !net.agent(me)
                .room(&room_id)
                .is_some_and(|room| room.contains(&participant("carol")))
        );
    }
}

#[tokio::test]
async fn test_leave_unknown_room_fails() {
    init_tracing();
    let mut net = TestNetwork::new();
    let _ = build_mesh(&mut net).await;

    let result = net.agent("alice").leave_room(&"elsewhere".into()).await;
    assert!(result.is_err());
    assert_eq!(net.agent("alice").sessions().count(), 2);
}
