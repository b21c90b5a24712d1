use tether_core::DecodeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid relay url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to connect to relay {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("timed out after {secs}s connecting to relay {url}")]
    ConnectTimeout { url: String, secs: u64 },
}

/// Failure reported by the media engine for one operation.
#[derive(Debug, Clone, Error)]
#[error("{operation} failed: {reason}")]
pub struct EngineError {
    pub operation: &'static str,
    pub reason: String,
}

impl EngineError {
    pub fn new(operation: &'static str, reason: impl ToString) -> Self {
        Self {
            operation,
            reason: reason.to_string(),
        }
    }
}

/// Every way a session can end. Rendered as the operator-facing log line.
#[derive(Debug, Error)]
pub enum ShutdownReason {
    #[error("Server connection closed{}", close_suffix(.0))]
    RelayClosed(Option<String>),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("protocol violation: {0}")]
    Protocol(DecodeError),

    #[error("Data channel '{label}' error: {reason}")]
    DataChannelError { label: String, reason: String },

    #[error("Data channel '{label}' closed")]
    DataChannelClosed { label: String },

    #[error("media engine: {0}")]
    Engine(#[from] EngineError),

    #[error("interrupted")]
    Interrupted,
}

impl ShutdownReason {
    /// Peer close and operator interrupt are orderly endings; everything else is a failure.
    pub fn is_orderly(&self) -> bool {
        matches!(self, ShutdownReason::RelayClosed(_) | ShutdownReason::Interrupted)
    }
}

fn close_suffix(reason: &Option<String>) -> String {
    match reason.as_deref() {
        Some(reason) if !reason.is_empty() => format!(": {reason}"),
        _ => String::new(),
    }
}
