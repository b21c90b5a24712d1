use tether_client::{ShutdownReason, TransportEvent};

use crate::integration::{TestSession, create_test_session, init_tracing};
use crate::utils::{EngineCall, MockEngine};

#[tokio::test]
async fn test_relay_closed_runs_shutdown_once() {
    init_tracing();

    let engine = MockEngine::new();
    let session = create_test_session(engine.clone());
    let signaling = session.signaling.clone();
    let shutdown = session.shutdown.clone();

    session
        .relay_tx
        .send(TransportEvent::Closed {
            reason: Some("bye".into()),
        })
        .unwrap();

    let reason = session.finish().await;
    match &reason {
        ShutdownReason::RelayClosed(Some(r)) => assert_eq!(r, "bye"),
        other => panic!("Unexpected shutdown reason: {other:?}"),
    }
    assert!(reason.is_orderly());

    assert!(shutdown.is_triggered());
    assert!(!shutdown.trigger(ShutdownReason::Interrupted));
    assert_eq!(signaling.close_calls(), 1);
    assert_eq!(engine.count(&EngineCall::Close), 1);
    assert_eq!(engine.calls().last(), Some(&EngineCall::Close));
}

#[tokio::test]
async fn test_relay_event_stream_ending_is_a_close() {
    init_tracing();

    let TestSession {
        relay_tx, handle, ..
    } = create_test_session(MockEngine::new());
    drop(relay_tx);

    let reason = tokio::time::timeout(std::time::Duration::from_secs(5), handle)
        .await
        .expect("Session did not stop")
        .unwrap();
    assert!(matches!(reason, ShutdownReason::RelayClosed(None)));
}
