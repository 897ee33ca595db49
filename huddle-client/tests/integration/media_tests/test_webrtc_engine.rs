use crate::integration::init_tracing;
use crate::utils::participant;
use huddle_client::{MediaEngine, WebRtcEngine};
use huddle_core::SdpKind;

#[tokio::test]
async fn test_webrtc_engines_exchange_descriptions() {
    init_tracing();
    let (alice, _alice_events) = WebRtcEngine::new(&[]);
    let (bob, _bob_events) = WebRtcEngine::new(&[]);
    let alice_id = participant("alice");
    let bob_id = participant("bob");

    alice.acquire_local_media(true).await.unwrap();
    bob.acquire_local_media(true).await.unwrap();

    let offer = alice.create_offer(&bob_id, true).await.unwrap();
    assert_eq!(offer.kind, SdpKind::Offer);
    assert!(offer.sdp.starts_with("v=0"));
    assert!(offer.sdp.contains("m=audio"));
    assert!(offer.sdp.contains("m=video"));

    bob.set_remote_description(&alice_id, &offer).await.unwrap();
    let answer = bob.create_answer(&alice_id).await.unwrap();
    assert_eq!(answer.kind, SdpKind::Answer);
    assert!(answer.sdp.starts_with("v=0"));

    alice.set_remote_description(&bob_id, &answer).await.unwrap();
    assert_eq!(alice.peer_count(), 1);
    assert_eq!(bob.peer_count(), 1);

    alice.close_peer(&bob_id).await;
    bob.close_peer(&alice_id).await;
    assert_eq!(alice.peer_count(), 0);
    assert_eq!(bob.peer_count(), 0);
}

#[tokio::test]
async fn test_answer_before_offer_is_rejected() {
    init_tracing();
    let (engine, _events) = WebRtcEngine::new(&[]);
    let answer = huddle_core::SessionDescription::answer("v=0\r\n");

    let result = engine
        .set_remote_description(&participant("bob"), &answer)
        .await;
    assert!(result.is_err());
    assert_eq!(engine.peer_count(), 0);
}
