use huddle_core::SignalEnvelope;

use crate::integration::{create_test_relay, init_tracing};
use crate::utils::TestPeer;

#[tokio::test]
async fn test_reconnect_survives_stale_disconnect() {
    init_tracing();

    let relay = create_test_relay();
    let mut stale = TestPeer::join(&relay, "alice");
    let mut fresh = TestPeer::join(&relay, "alice");
    let bob = TestPeer::join(&relay, "bob");

    // The old socket closes after the new one registered.
    assert!(relay.disconnect(stale.endpoint.id()).is_empty());

    bob.send(
        &relay,
        SignalEnvelope::Accept {
            to: "alice".into(),
            from: "bob".into(),
        },
    )
    .expect("alice still online");

    assert!(stale.inbox().is_empty());
    assert_eq!(fresh.inbox().len(), 1);

    // The stale socket can no longer speak for alice.
    let spoof = stale.send(
        &relay,
        SignalEnvelope::End {
            to: "bob".into(),
            from: "alice".into(),
        },
    );
    assert!(spoof.is_err());
}
