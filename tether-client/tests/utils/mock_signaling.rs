use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tether_client::{MessageCodec, RelayState, SignalingMessage, SignalingOutput};
use tokio::sync::{mpsc, watch};

/// Mock SignalingOutput that captures every outgoing frame.
#[derive(Clone)]
pub struct MockSignalingOutput {
    /// Channel to forward captured frames.
    tx: mpsc::UnboundedSender<String>,
    /// All captured frames (for verification).
    frames: Arc<Mutex<Vec<String>>>,
    close_calls: Arc<AtomicUsize>,
    state: Arc<watch::Sender<RelayState>>,
}

impl MockSignalingOutput {
    /// Create an open MockSignalingOutput and its receiver channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let signaling = Self {
            tx,
            frames: Arc::new(Mutex::new(Vec::new())),
            close_calls: Arc::new(AtomicUsize::new(0)),
            state: Arc::new(watch::channel(RelayState::Open).0),
        };
        (signaling, rx)
    }

    pub fn frames(&self) -> Vec<String> {
        self.frames.lock().unwrap().clone()
    }

    /// Captured frames decoded back into messages.
    pub fn messages(&self) -> Vec<SignalingMessage> {
        self.frames()
            .iter()
            .map(|f| MessageCodec::decode(f).expect("captured frame should decode"))
            .collect()
    }

    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SignalingOutput for MockSignalingOutput {
    fn state(&self) -> RelayState {
        *self.state.borrow()
    }

    fn send_text(&self, text: String) {
        tracing::debug!("[MockSignaling] send_text {}", text);

        if self.state() != RelayState::Open {
            return;
        }
        self.frames.lock().unwrap().push(text.clone());
        let _ = self.tx.send(text);
    }

    fn close(&self) {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        self.state.send_replace(RelayState::Closed);
    }

    async fn closed(&self) {
        let mut rx = self.state.subscribe();
        let _ = rx.wait_for(|s| *s == RelayState::Closed).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_client::IceCandidate;

    #[tokio::test]
    async fn test_mock_signaling_captures_frames() {
        let (signaling, mut rx) = MockSignalingOutput::new();

        signaling.send_message(&SignalingMessage::SdpOffer { sdp: "v=0".into() });

        let frame = rx.recv().await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value, serde_json::json!({"sdp": {"type": "offer", "sdp": "v=0"}}));
        assert_eq!(signaling.frames().len(), 1);
    }

    #[tokio::test]
    async fn test_mock_signaling_drops_frames_after_close() {
        let (signaling, _rx) = MockSignalingOutput::new();

        signaling.close();
        signaling.send_message(&SignalingMessage::IceCandidate(IceCandidate::new(0, "c")));
        signaling.closed().await;

        assert!(signaling.frames().is_empty());
        assert_eq!(signaling.close_calls(), 1);
    }
}
