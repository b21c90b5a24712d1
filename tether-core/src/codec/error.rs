use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("frame is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("frame is not a JSON object")]
    NotAnObject,

    #[error("received SDP without 'type'")]
    MissingSdpType,

    #[error("unsupported SDP type '{0}'")]
    UnsupportedSdpType(String),

    #[error("invalid {kind} payload: {reason}")]
    InvalidPayload { kind: &'static str, reason: String },

    #[error("unknown message shape {0}")]
    UnknownShape(String),
}

impl DecodeError {
    /// Whether the session can no longer continue after this frame.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DecodeError::MissingSdpType)
    }
}
