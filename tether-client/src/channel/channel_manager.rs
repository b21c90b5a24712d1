use crate::engine::{ChannelEvent, ChannelEventKind, ChannelObserver, DataChannel, MediaEngine};
use crate::{EngineError, ShutdownReason};
use bytes::Bytes;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Payload sent after the greeting text, once a channel opens.
const GREETING_BYTES: &[u8] = b"data";

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct ChannelId(u64);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dc-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ChannelState {
    Connecting,
    Open,
    Closed,
    Errored,
}

/// Text received on a data channel, handed to the application layer.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InboundMessage {
    pub label: String,
    pub text: String,
}

struct TrackedChannel {
    handle: Arc<dyn DataChannel>,
    label: String,
    state: ChannelState,
}

/// Tracks the control channel and every channel the remote peer opens.
///
/// Any channel closing or failing ends the session; there is no recreation.
pub struct DataChannelManager {
    channels: HashMap<ChannelId, TrackedChannel>,
    next_id: u64,
    events_tx: mpsc::UnboundedSender<ChannelEvent>,
    greeting: String,
    application: Option<mpsc::UnboundedSender<InboundMessage>>,
}

impl DataChannelManager {
    pub fn new(events_tx: mpsc::UnboundedSender<ChannelEvent>, greeting: impl Into<String>) -> Self {
        Self {
            channels: HashMap::new(),
            next_id: 0,
            events_tx,
            greeting: greeting.into(),
            application: None,
        }
    }

    pub fn set_application_sink(&mut self, sink: mpsc::UnboundedSender<InboundMessage>) {
        self.application = Some(sink);
    }

    /// Create the local channel that rides along with the first offer.
    pub async fn open_control_channel(
        &mut self,
        engine: &dyn MediaEngine,
        label: &str,
    ) -> Result<ChannelId, EngineError> {
        let handle = engine.create_data_channel(label).await?;
        info!("Created data channel '{}'", label);
        Ok(self.track(handle))
    }

    /// Start observing a channel and return the id its events will carry.
    pub fn track(&mut self, handle: Arc<dyn DataChannel>) -> ChannelId {
        let id = ChannelId(self.next_id);
        self.next_id += 1;

        let label = handle.label().to_owned();
        debug!("Tracking data channel '{}' as {}", label, id);
        handle.observe(ChannelObserver::new(id, self.events_tx.clone()));

        self.channels.insert(
            id,
            TrackedChannel {
                handle,
                label,
                state: ChannelState::Connecting,
            },
        );
        id
    }

    pub fn state(&self, id: ChannelId) -> Option<ChannelState> {
        self.channels.get(&id).map(|c| c.state)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Apply one channel event. Returns the reason to end the session, if any.
    pub fn handle_event(&mut self, event: ChannelEvent) -> Option<ShutdownReason> {
        let Some(channel) = self.channels.get_mut(&event.channel) else {
            warn!("Event for unknown data channel {}: {:?}", event.channel, event.kind);
            return None;
        };

        match event.kind {
            ChannelEventKind::Open => {
                info!("Data channel '{}' opened", channel.label);
                channel.state = ChannelState::Open;
                Self::send_greeting(channel.handle.clone(), self.greeting.clone());
                None
            }
            ChannelEventKind::Error(reason) => {
                channel.state = ChannelState::Errored;
                Some(ShutdownReason::DataChannelError {
                    label: channel.label.clone(),
                    reason,
                })
            }
            ChannelEventKind::Close => {
                channel.state = ChannelState::Closed;
                Some(ShutdownReason::DataChannelClosed {
                    label: channel.label.clone(),
                })
            }
            ChannelEventKind::Message(text) => {
                info!("Received data channel message: {}", text);
                if let Some(application) = &self.application {
                    let _ = application.send(InboundMessage {
                        label: channel.label.clone(),
                        text,
                    });
                }
                None
            }
            ChannelEventKind::Binary(data) => {
                debug!(
                    "Received {} bytes on data channel '{}'",
                    data.len(),
                    channel.label
                );
                None
            }
        }
    }

    fn send_greeting(handle: Arc<dyn DataChannel>, greeting: String) {
        tokio::spawn(async move {
            if let Err(e) = handle.send_text(&greeting).await {
                warn!("Failed to greet on '{}': {}", handle.label(), e);
                return;
            }
            if let Err(e) = handle.send_binary(Bytes::from_static(GREETING_BYTES)).await {
                warn!("Failed to greet on '{}': {}", handle.label(), e);
            }
        });
    }
}
