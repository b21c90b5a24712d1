use std::time::Duration;
use tether_client::{PeerId, RelayConfig, RelayConnection, RelayState, SignalingOutput, TransportError};

use crate::integration::init_tracing;
use crate::utils::TestRelay;

pub fn relay_config(url: &str) -> RelayConfig {
    RelayConfig {
        url: url.to_owned(),
        peer_id: PeerId::from("streamer"),
        connect_timeout: Duration::from_secs(5),
    }
}

#[tokio::test]
async fn test_connect_identifies_with_client_id() {
    init_tracing();

    let mut relay = TestRelay::spawn().await;

    let (connection, _events) = RelayConnection::connect(&relay_config(&relay.url))
        .await
        .expect("Failed to connect to test relay");

    let client_id = tokio::time::timeout(Duration::from_secs(5), relay.client_ids.recv())
        .await
        .expect("Timed out waiting for client id")
        .unwrap();
    assert_eq!(client_id, "streamer");
    assert_eq!(connection.state(), RelayState::Open);
    assert!(connection.endpoint().ends_with("client_id=streamer"));
}

#[tokio::test]
async fn test_connect_failure_is_reported() {
    init_tracing();

    let result = RelayConnection::connect(&relay_config("ws://127.0.0.1:1")).await;

    assert!(matches!(result, Err(TransportError::Connect { .. })));
}

#[tokio::test]
async fn test_non_websocket_url_is_rejected() {
    init_tracing();

    let result = RelayConnection::connect(&relay_config("http://localhost:8888")).await;

    assert!(matches!(result, Err(TransportError::InvalidUrl { .. })));
}
