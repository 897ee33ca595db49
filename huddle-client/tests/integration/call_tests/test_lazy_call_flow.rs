use crate::integration::init_tracing;
use crate::utils::{CANDIDATES_PER_DESCRIPTION, EngineCall, TestNetwork, participant};
use huddle_client::{AgentConfig, CallEvent, MediaEvent, NegotiationState, PeerSession, Role};
use huddle_core::{RoomId, SdpKind};

#[tokio::test]
async fn test_lazy_call_rings_before_media() {
    init_tracing();
    let mut net = TestNetwork::new();
    net.join("alice", AgentConfig::lazy()).await;
    net.join("bob", AgentConfig::lazy()).await;
    let alice = participant("alice");
    let bob = participant("bob");

    let room = net
        .agent("alice")
        .call(bob.clone(), false, Some("r1".into()))
        .await
        .unwrap();
    assert_eq!(room, RoomId::from("r1"));
    net.settle().await;

    assert_eq!(
        net.node("bob").events(),
        vec![CallEvent::IncomingCall {
            from: alice.clone(),
            room_id: "r1".into(),
            is_video: false,
        }]
    );
    assert!(net.agent("bob").is_ringing(&alice));
    assert_eq!(
        net.agent("alice").session(&bob).map(PeerSession::state),
        Some(NegotiationState::Idle)
    );
    assert_eq!(net.node("alice").engine.acquire_count().await, 0);
    assert_eq!(net.node("bob").engine.acquire_count().await, 0);

    net.agent("bob").accept(alice.clone()).await.unwrap();
    net.settle().await;

    for (me, peer, role) in [
        ("alice", "bob", Role::Initiator),
        ("bob", "alice", Role::Responder),
    ] {
        let session = net
            .agent(me)
            .session(&participant(peer))
            .expect("session should exist");
        assert_eq!(session.state(), NegotiationState::DescriptionExchanged);
        assert_eq!(session.role(), role);
        assert_eq!(session.room_id(), Some(&RoomId::from("r1")));
        assert_eq!(net.node(me).engine.acquire_count().await, 1);
        assert_eq!(
            net.node(me).engine.candidates_added(peer).await.len(),
            CANDIDATES_PER_DESCRIPTION
        );
    }

    let bob_calls = net.node("bob").engine.calls_for("alice").await;
    assert_eq!(
        bob_calls[0],
        EngineCall::SetRemote {
            peer: alice.clone(),
            kind: SdpKind::Offer,
        }
    );
    assert_eq!(bob_calls[1], EngineCall::CreateAnswer { peer: alice });

    let alice_events = net.node("alice").events();
    assert!(alice_events.contains(&CallEvent::CallAccepted { peer: bob.clone() }));
    assert!(alice_events.contains(&CallEvent::NegotiationComplete { peer: bob.clone() }));
}

#[tokio::test]
async fn test_connected_after_exchange() {
    init_tracing();
    let mut net = TestNetwork::new();
    net.join("alice", AgentConfig::lazy()).await;
    net.join("bob", AgentConfig::lazy()).await;
    let bob = participant("bob");

    net.agent("alice").call(bob.clone(), true, None).await.unwrap();
    net.settle().await;
    net.agent("bob").accept(participant("alice")).await.unwrap();
    net.settle().await;
    net.node("alice").events();

    net.agent("alice")
        .handle_media_event(MediaEvent::Connected { peer: bob.clone() })
        .await
        .unwrap();

    assert_eq!(
        net.agent("alice").session(&bob).map(PeerSession::state),
        Some(NegotiationState::Connected)
    );
    assert_eq!(
        net.node("alice").events(),
        vec![CallEvent::Connected { peer: bob }]
    );
}

#[tokio::test]
async fn test_second_call_to_same_peer_is_refused() {
    init_tracing();
    let mut net = TestNetwork::new();
    net.join("alice", AgentConfig::lazy()).await;
    net.join("bob", AgentConfig::lazy()).await;
    let bob = participant("bob");

    net.agent("alice").call(bob.clone(), false, None).await.unwrap();
    let err = net.agent("alice").call(bob, false, None).await;

    assert!(err.is_err());
    assert_eq!(net.agent("alice").sessions().count(), 1);
}
