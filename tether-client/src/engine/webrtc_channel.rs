use crate::EngineError;
use crate::engine::{ChannelObserver, DataChannel};
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_message::DataChannelMessage;

pub struct WebRtcDataChannel {
    channel: Arc<RTCDataChannel>,
}

impl WebRtcDataChannel {
    pub fn new(channel: Arc<RTCDataChannel>) -> Self {
        Self { channel }
    }
}

#[async_trait]
impl DataChannel for WebRtcDataChannel {
    fn label(&self) -> &str {
        self.channel.label()
    }

    fn observe(&self, observer: ChannelObserver) {
        let on_open = observer.clone();
        self.channel.on_open(Box::new(move || {
            Box::pin(async move {
                on_open.opened();
            })
        }));

        let on_close = observer.clone();
        self.channel.on_close(Box::new(move || {
            let observer = on_close.clone();
            Box::pin(async move {
                observer.closed();
            })
        }));

        let on_error = observer.clone();
        self.channel.on_error(Box::new(move |err: webrtc::Error| {
            let observer = on_error.clone();
            Box::pin(async move {
                observer.errored(err.to_string());
            })
        }));

        self.channel.on_message(Box::new(move |msg: DataChannelMessage| {
            let observer = observer.clone();
            Box::pin(async move {
                if msg.is_string {
                    observer.message(String::from_utf8_lossy(&msg.data).into_owned());
                } else {
                    observer.binary(msg.data);
                }
            })
        }));
    }

    async fn send_text(&self, text: &str) -> Result<(), EngineError> {
        self.channel
            .send_text(text.to_owned())
            .await
            .map(|_| ())
            .map_err(|e| EngineError::new("send-string", e))
    }

    async fn send_binary(&self, data: Bytes) -> Result<(), EngineError> {
        self.channel
            .send(&data)
            .await
            .map(|_| ())
            .map_err(|e| EngineError::new("send-data", e))
    }
}
