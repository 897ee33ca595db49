use huddle_core::SignalEnvelope;
use serde_json::json;

use crate::integration::{create_test_relay, init_tracing};
use crate::utils::TestPeer;

#[tokio::test]
async fn test_rapid_candidates_keep_order() {
    init_tracing();

    let relay = create_test_relay();
    let alice = TestPeer::join(&relay, "alice");
    let mut bob = TestPeer::join(&relay, "bob");

    for i in 0..100u16 {
        alice
            .send(
                &relay,
                SignalEnvelope::Candidate {
                    to: "bob".into(),
                    from: Some("alice".into()),
                    candidate: json!({"candidate": format!("candidate:{}", i), "sdpMid": "0", "sdpMLineIndex": 0}),
                },
            )
            .expect("candidate routed");
    }

    let received: Vec<String> = bob
        .inbox()
        .into_iter()
        .map(|envelope| match envelope {
            SignalEnvelope::Candidate { candidate, .. } => candidate["candidate"]
                .as_str()
                .unwrap_or_default()
                .to_owned(),
            other => panic!("unexpected {:?}", other),
        })
        .collect();

    let expected: Vec<String> = (0..100).map(|i| format!("candidate:{}", i)).collect();
    assert_eq!(received, expected);
}
