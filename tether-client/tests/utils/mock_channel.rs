use async_trait::async_trait;
use bytes::Bytes;
use std::sync::{Arc, Mutex};
use tether_client::{ChannelObserver, DataChannel, EngineError};

#[derive(Debug, Clone, PartialEq)]
pub enum SentPayload {
    Text(String),
    Binary(Bytes),
}

/// Scriptable data channel: tests fire its events and inspect what was sent.
#[derive(Clone)]
pub struct MockDataChannel {
    label: String,
    observer: Arc<Mutex<Option<ChannelObserver>>>,
    sent: Arc<Mutex<Vec<SentPayload>>>,
}

impl MockDataChannel {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_owned(),
            observer: Arc::new(Mutex::new(None)),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn is_observed(&self) -> bool {
        self.observer.lock().unwrap().is_some()
    }

    pub fn sent(&self) -> Vec<SentPayload> {
        self.sent.lock().unwrap().clone()
    }

    pub fn fire_open(&self) {
        self.with_observer(|o| o.opened());
    }

    pub fn fire_close(&self) {
        self.with_observer(|o| o.closed());
    }

    pub fn fire_error(&self, reason: &str) {
        self.with_observer(|o| o.errored(reason));
    }

    pub fn fire_message(&self, text: &str) {
        self.with_observer(|o| o.message(text));
    }

    fn with_observer(&self, f: impl FnOnce(&ChannelObserver)) {
        let observer = self.observer.lock().unwrap();
        f(observer.as_ref().expect("channel is not observed yet"));
    }
}

#[async_trait]
impl DataChannel for MockDataChannel {
    fn label(&self) -> &str {
        &self.label
    }

    fn observe(&self, observer: ChannelObserver) {
        *self.observer.lock().unwrap() = Some(observer);
    }

    async fn send_text(&self, text: &str) -> Result<(), EngineError> {
        self.sent.lock().unwrap().push(SentPayload::Text(text.to_owned()));
        Ok(())
    }

    async fn send_binary(&self, data: Bytes) -> Result<(), EngineError> {
        self.sent.lock().unwrap().push(SentPayload::Binary(data));
        Ok(())
    }
}
