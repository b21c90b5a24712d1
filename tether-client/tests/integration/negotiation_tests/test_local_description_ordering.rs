use std::time::Duration;
use tether_client::{
    EngineEvent, IceCandidate, NegotiationState, SdpKind, ShutdownReason, SignalingMessage,
};

use crate::integration::{create_test_session, init_tracing};
use crate::utils::{
    EngineCall, LOCAL_ANSWER_SDP, LOCAL_OFFER_SDP, MockEngine, REMOTE_ANSWER_SDP,
    REMOTE_OFFER_SDP, answer_frame, offer_frame, wait_until,
};

const HOST_CANDIDATE: &str = "candidate:1 1 UDP 2122252543 10.0.0.2 50000 typ host";

#[tokio::test]
async fn test_offer_precedes_candidates_gathered_by_set_local() {
    init_tracing();

    let engine = MockEngine::new().gathering_on_set_local(IceCandidate::new(0, HOST_CANDIDATE));
    let session = create_test_session(engine.clone());

    session.engine_event(EngineEvent::NegotiationNeeded);

    let signaling = session.signaling.clone();
    assert!(wait_until(2000, || signaling.frames().len() >= 2).await);

    let messages = session.signaling.messages();
    assert_eq!(
        messages[0],
        SignalingMessage::SdpOffer {
            sdp: LOCAL_OFFER_SDP.into()
        }
    );
    assert_eq!(
        messages[1],
        SignalingMessage::IceCandidate(IceCandidate::new(0, HOST_CANDIDATE))
    );

    session.shutdown.trigger(ShutdownReason::Interrupted);
    session.finish().await;
}

#[tokio::test]
async fn test_answer_precedes_candidates_gathered_by_set_local() {
    init_tracing();

    let engine = MockEngine::new().gathering_on_set_local(IceCandidate::new(0, HOST_CANDIDATE));
    let mut session = create_test_session(engine.clone());

    session.relay_frame(offer_frame(REMOTE_OFFER_SDP));
    session.wait_for_state(NegotiationState::Negotiated).await;

    let signaling = session.signaling.clone();
    assert!(wait_until(2000, || signaling.frames().len() >= 2).await);

    let messages = session.signaling.messages();
    assert_eq!(
        messages[0],
        SignalingMessage::SdpAnswer {
            sdp: LOCAL_ANSWER_SDP.into()
        }
    );
    assert!(matches!(messages[1], SignalingMessage::IceCandidate(_)));

    session.shutdown.trigger(ShutdownReason::Interrupted);
    session.finish().await;
}

#[tokio::test]
async fn test_early_answer_waits_for_local_description() {
    init_tracing();

    // Slow engine: the answer arrives while set-local is still running
    let engine = MockEngine::new().with_delay(Duration::from_millis(50));
    let mut session = create_test_session(engine.clone());

    session.engine_event(EngineEvent::NegotiationNeeded);
    tokio::time::timeout(Duration::from_secs(5), session.outbound_rx.recv())
        .await
        .expect("Timed out waiting for offer")
        .expect("Outbound channel closed");

    session.relay_frame(answer_frame(REMOTE_ANSWER_SDP));
    session.wait_for_state(NegotiationState::Negotiated).await;

    let local = engine
        .position(&EngineCall::SetLocalDescription(SdpKind::Offer))
        .unwrap();
    let remote = engine
        .position(&EngineCall::SetRemoteDescription(SdpKind::Answer))
        .unwrap();
    assert!(local < remote);
    assert_eq!(
        engine.count(&EngineCall::SetRemoteDescription(SdpKind::Answer)),
        1
    );

    session.shutdown.trigger(ShutdownReason::Interrupted);
    session.finish().await;
}
