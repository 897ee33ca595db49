use crate::integration::init_tracing;
use crate::utils::{TestNetwork, participant};
use huddle_client::{AgentConfig, CallEvent, ClientError, MediaError};

#[tokio::test]
async fn test_capture_failure_ends_the_call() {
    init_tracing();
    let mut net = TestNetwork::new();
    net.join("alice", AgentConfig::eager()).await;
    net.join("bob", AgentConfig::lazy()).await;
    net.node("alice").engine.deny_capture();
    let alice = participant("alice");
    let bob = participant("bob");

    let result = net.agent("alice").call(bob.clone(), true, Some("r1".into())).await;
    assert!(matches!(
        result,
        Err(ClientError::Media(MediaError::CaptureUnavailable(_)))
    ));
    assert!(net.agent("alice").session(&bob).is_none());
    assert!(matches!(
        net.node("alice").events().as_slice(),
        [CallEvent::NegotiationFailed { peer, .. }] if *peer == bob
    ));

    net.settle().await;
    assert_eq!(
        net.node("bob").events(),
        vec![
            CallEvent::IncomingCall {
                from: alice.clone(),
                room_id: "r1".into(),
                is_video: true,
            },
            CallEvent::CallEnded { peer: alice.clone() },
        ]
    );
    assert!(net.agent("bob").session(&alice).is_none());
}
