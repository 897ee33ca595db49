use crate::integration::init_tracing;
use crate::utils::{EngineCall, TestNetwork, participant};
use huddle_client::{AgentConfig, CallEvent, ClientError, NegotiationState, PeerSession, Role};
use huddle_core::SignalEnvelope;

#[tokio::test]
async fn test_reject_never_touches_media() {
    init_tracing();
    let mut net = TestNetwork::new();
    net.join("alice", AgentConfig::lazy()).await;
    net.join("bob", AgentConfig::lazy()).await;
    let alice = participant("alice");
    let bob = participant("bob");

    net.agent("alice").call(bob.clone(), false, None).await.unwrap();
    net.settle().await;
    net.agent("bob").reject(alice.clone()).await.unwrap();
    net.settle().await;

    assert!(net.agent("alice").session(&bob).is_none());
    assert!(net.agent("bob").session(&alice).is_none());
    assert_eq!(
        net.node("alice").engine.calls_for("bob").await,
        vec![EngineCall::Close { peer: bob.clone() }]
    );
    assert_eq!(net.node("alice").engine.acquire_count().await, 0);
    assert_eq!(net.node("bob").engine.acquire_count().await, 0);
    assert!(
        net.node("alice")
            .events()
            .contains(&CallEvent::CallRejected { peer: bob })
    );

    let again = net.agent("bob").reject(alice).await;
    assert!(matches!(again, Err(ClientError::NoPendingCall(_))));
}

#[tokio::test]
async fn test_eager_caller_releases_media_on_reject() {
    init_tracing();
    let mut net = TestNetwork::new();
    net.join("alice", AgentConfig::eager()).await;
    net.join("bob", AgentConfig::lazy()).await;
    let bob = participant("bob");

    net.agent("alice").call(bob.clone(), false, None).await.unwrap();
    net.settle().await;
    net.agent("bob").reject(participant("alice")).await.unwrap();
    net.settle().await;

    let calls = net.node("alice").engine.calls().await;
    assert!(calls.contains(&EngineCall::Close { peer: bob }));
    assert_eq!(calls.last(), Some(&EngineCall::Release));
    assert_eq!(net.node("bob").engine.acquire_count().await, 0);
    assert!(!net.agent("alice").media_acquired());
}

#[tokio::test]
async fn test_stray_accept_does_not_start_callee_media() {
    init_tracing();
    let mut net = TestNetwork::new();
    net.join("alice", AgentConfig::lazy()).await;
    net.join("bob", AgentConfig::lazy()).await;
    let alice = participant("alice");
    let bob = participant("bob");

    net.agent("bob").call(alice.clone(), false, None).await.unwrap();
    net.settle().await;
    net.node("alice").events();

    net.inject(
        "alice",
        SignalEnvelope::Accept {
            to: alice.clone(),
            from: bob.clone(),
        },
    )
    .await;
    net.settle().await;

    assert_eq!(net.node("alice").engine.acquire_count().await, 0);
    assert!(net.node("alice").engine.calls_for("bob").await.is_empty());
    assert!(net.agent("alice").is_ringing(&bob));
    assert_eq!(
        net.agent("alice")
            .session(&bob)
            .map(|s| (s.state(), s.role())),
        Some((NegotiationState::Idle, Role::Responder))
    );
    assert!(net.node("alice").events().is_empty());
    assert_eq!(
        net.agent("bob").session(&alice).map(PeerSession::state),
        Some(NegotiationState::Idle)
    );
}
