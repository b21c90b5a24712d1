/// Connection-level events surfaced by the relay connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// One text frame (binary frames are delivered here if they are valid UTF-8).
    Message(String),

    /// The connection is gone, whichever side closed it.
    Closed { reason: Option<String> },
}
