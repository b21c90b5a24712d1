use bytes::Bytes;
use tether_client::ShutdownReason;

use crate::integration::{create_test_session, init_tracing};
use crate::utils::{EngineCall, MockEngine, SentPayload, wait_until};

#[tokio::test]
async fn test_control_channel_created_before_negotiation() {
    init_tracing();

    let engine = MockEngine::new();
    let session = create_test_session(engine.clone());

    let channel = session.control_channel().await;
    assert_eq!(tether_client::DataChannel::label(&channel), "channel");
    assert_eq!(
        engine.calls().first(),
        Some(&EngineCall::CreateDataChannel("channel".into()))
    );

    session.shutdown.trigger(ShutdownReason::Interrupted);
    session.finish().await;
}

#[tokio::test]
async fn test_greeting_sent_when_channel_opens() {
    init_tracing();

    let session = create_test_session(MockEngine::new());
    let channel = session.control_channel().await;

    channel.fire_open();

    let watched = channel.clone();
    assert!(wait_until(2000, || watched.sent().len() == 2).await);
    assert_eq!(
        channel.sent(),
        vec![
            SentPayload::Text("Data channel opened".into()),
            SentPayload::Binary(Bytes::from_static(b"data")),
        ]
    );

    session.shutdown.trigger(ShutdownReason::Interrupted);
    session.finish().await;
}

#[tokio::test]
async fn test_control_channel_failure_ends_session() {
    init_tracing();

    let engine = MockEngine::new().failing("create-data-channel");
    let session = create_test_session(engine.clone());

    let reason = session.finish().await;
    match reason {
        ShutdownReason::Engine(e) => assert_eq!(e.operation, "create-data-channel"),
        other => panic!("Unexpected shutdown reason: {other:?}"),
    }
    assert_eq!(engine.count(&EngineCall::Close), 1);
}
