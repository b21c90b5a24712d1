use std::time::Duration;
use tether_client::{IceCandidate, ShutdownReason};

use crate::integration::{create_test_session, init_tracing};
use crate::utils::{EngineCall, MockEngine, remote_candidate_frame, wait_until};

const REMOTE_CANDIDATE: &str = "candidate:1 1 UDP 2122252543 192.168.1.20 54321 typ host";

#[tokio::test]
async fn test_remote_candidate_is_added_once() {
    init_tracing();

    let engine = MockEngine::new();
    let session = create_test_session(engine.clone());

    session.relay_frame(remote_candidate_frame(REMOTE_CANDIDATE, 0));

    let expected = EngineCall::AddIceCandidate(IceCandidate::new(0, REMOTE_CANDIDATE));
    let watched = engine.clone();
    assert!(wait_until(2000, || watched.count(&expected) > 0).await);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(engine.count(&expected), 1);

    session.shutdown.trigger(ShutdownReason::Interrupted);
    session.finish().await;
}

#[tokio::test]
async fn test_failed_candidate_is_not_fatal() {
    init_tracing();

    let engine = MockEngine::new().failing("add-ice-candidate");
    let session = create_test_session(engine.clone());

    session.relay_frame(remote_candidate_frame(REMOTE_CANDIDATE, 1));

    let expected = EngineCall::AddIceCandidate(IceCandidate::new(1, REMOTE_CANDIDATE));
    let watched = engine.clone();
    assert!(wait_until(2000, || watched.count(&expected) > 0).await);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!session.handle.is_finished());

    session.shutdown.trigger(ShutdownReason::Interrupted);
    session.finish().await;
}
