use crate::channel::ChannelId;
use bytes::Bytes;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEventKind {
    Open,
    Close,
    Error(String),
    Message(String),
    Binary(Bytes),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelEvent {
    pub channel: ChannelId,
    pub kind: ChannelEventKind,
}

/// Handle an engine uses to report one channel's events back to the session loop.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    channel: ChannelId,
    tx: mpsc::UnboundedSender<ChannelEvent>,
}

impl ChannelObserver {
    pub fn new(channel: ChannelId, tx: mpsc::UnboundedSender<ChannelEvent>) -> Self {
        Self { channel, tx }
    }

    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    pub fn opened(&self) {
        self.emit(ChannelEventKind::Open);
    }

    pub fn closed(&self) {
        self.emit(ChannelEventKind::Close);
    }

    pub fn errored(&self, reason: impl Into<String>) {
        self.emit(ChannelEventKind::Error(reason.into()));
    }

    pub fn message(&self, text: impl Into<String>) {
        self.emit(ChannelEventKind::Message(text.into()));
    }

    pub fn binary(&self, data: Bytes) {
        self.emit(ChannelEventKind::Binary(data));
    }

    // The loop may already be gone during teardown; late events are dropped.
    fn emit(&self, kind: ChannelEventKind) {
        let _ = self.tx.send(ChannelEvent {
            channel: self.channel,
            kind,
        });
    }
}
