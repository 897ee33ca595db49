use crate::integration::init_tracing;
use crate::utils::{EngineCall, TestNetwork, participant};
use huddle_client::{AgentConfig, NegotiationState, PeerSession};

#[tokio::test]
async fn test_eager_caller_offers_with_intent() {
    init_tracing();
    let mut net = TestNetwork::new();
    net.join("alice", AgentConfig::eager()).await;
    net.join("bob", AgentConfig::lazy()).await;
    let alice = participant("alice");
    let bob = participant("bob");

    net.agent("alice").call(bob.clone(), true, None).await.unwrap();
    assert_eq!(net.node("alice").engine.acquire_count().await, 1);
    assert_eq!(
        net.agent("alice").session(&bob).map(PeerSession::state),
        Some(NegotiationState::Offering)
    );
    net.settle().await;

    // The offer is applied but bob has not agreed to talk yet.
    let session = net.agent("bob").session(&alice).expect("bob should have a session");
    assert_eq!(session.state(), NegotiationState::Answering);
    assert!(session.is_video());
    assert_eq!(net.node("bob").engine.acquire_count().await, 0);

    net.agent("bob").accept(alice.clone()).await.unwrap();
    net.settle().await;

    assert_eq!(
        net.agent("alice").session(&bob).map(PeerSession::state),
        Some(NegotiationState::DescriptionExchanged)
    );
    assert_eq!(
        net.agent("bob").session(&alice).map(PeerSession::state),
        Some(NegotiationState::DescriptionExchanged)
    );

    let offers = net
        .node("alice")
        .engine
        .calls()
        .await
        .into_iter()
        .filter(|c| matches!(c, EngineCall::CreateOffer { .. }))
        .count();
    assert_eq!(offers, 1);
    assert_eq!(
        net.node("bob").engine.calls().await[0],
        EngineCall::SetRemote {
            peer: alice,
            kind: huddle_core::SdpKind::Offer,
        }
    );
}
