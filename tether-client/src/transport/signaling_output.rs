use async_trait::async_trait;
use std::fmt;
use tether_core::{MessageCodec, SignalingMessage};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RelayState {
    Open,
    /// A graceful close was requested and is in flight.
    Closing,
    Closed,
}

impl fmt::Display for RelayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RelayState::Open => "open",
            RelayState::Closing => "closing",
            RelayState::Closed => "closed",
        })
    }
}

/// Outbound half of the relay connection, as seen by the session.
///
/// Frames sent while the connection is not [`RelayState::Open`] are dropped
/// with a warning in every build profile.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    fn state(&self) -> RelayState;

    /// Queue one text frame. Never blocks.
    fn send_text(&self, text: String);

    /// Request a graceful close if the connection is open; otherwise do nothing.
    fn close(&self);

    /// Resolves once the connection has fully closed.
    async fn closed(&self);

    fn send_message(&self, message: &SignalingMessage) {
        self.send_text(MessageCodec::encode(message));
    }
}
