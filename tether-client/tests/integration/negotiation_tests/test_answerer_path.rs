use serde_json::json;
use std::time::Duration;
use tether_client::{EngineEvent, NegotiationState, SdpKind, ShutdownReason};

use crate::integration::{create_test_session, init_tracing};
use crate::utils::{
    EngineCall, LOCAL_ANSWER_SDP, MockEngine, REMOTE_OFFER_SDP, offer_frame, wait_until,
};

#[tokio::test]
async fn test_answerer_path_reaches_negotiated() {
    init_tracing();

    let engine = MockEngine::new().with_delay(Duration::from_millis(20));
    let mut session = create_test_session(engine.clone());

    session.relay_frame(offer_frame(REMOTE_OFFER_SDP));

    let frame = tokio::time::timeout(Duration::from_secs(5), session.outbound_rx.recv())
        .await
        .expect("Timed out waiting for answer")
        .expect("Outbound channel closed");
    let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
    assert_eq!(
        value,
        json!({"sdp": {"type": "answer", "sdp": LOCAL_ANSWER_SDP}})
    );

    session.wait_for_state(NegotiationState::Negotiated).await;

    // set-local is not awaited before the answer goes out
    let recorded = engine.clone();
    assert!(
        wait_until(2000, || recorded
            .position(&EngineCall::SetLocalDescription(SdpKind::Answer))
            .is_some())
        .await
    );

    let remote = engine
        .position(&EngineCall::SetRemoteDescription(SdpKind::Offer))
        .unwrap();
    let create = engine.position(&EngineCall::CreateAnswer).unwrap();
    let local = engine
        .position(&EngineCall::SetLocalDescription(SdpKind::Answer))
        .unwrap();
    assert!(remote < create && create < local);
    assert_eq!(engine.count(&EngineCall::CreateOffer), 0);

    session.shutdown.trigger(ShutdownReason::Interrupted);
    session.finish().await;
}

#[tokio::test]
async fn test_offer_while_offering_is_ignored() {
    init_tracing();

    let engine = MockEngine::new().with_delay(Duration::from_millis(10));
    let mut session = create_test_session(engine.clone());

    session.engine_event(EngineEvent::NegotiationNeeded);
    tokio::time::timeout(Duration::from_secs(5), session.outbound_rx.recv())
        .await
        .expect("Timed out waiting for offer")
        .expect("Outbound channel closed");

    session.relay_frame(offer_frame(REMOTE_OFFER_SDP));
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(
        engine.count(&EngineCall::SetRemoteDescription(SdpKind::Offer)),
        0
    );
    assert_eq!(engine.count(&EngineCall::CreateAnswer), 0);
    assert!(!session.handle.is_finished());

    session.shutdown.trigger(ShutdownReason::Interrupted);
    session.finish().await;
}
