//! Boundary to the media engine that owns the peer connection.
//!
//! The session never touches the engine's own types: it issues the async
//! operations of [`MediaEngine`] and consumes [`EngineEvent`]s and
//! [`ChannelEvent`]s from channels handed to the engine at construction.

mod channel_event;
mod engine_config;
mod engine_event;
mod webrtc_channel;
mod webrtc_engine;

pub use channel_event::{ChannelEvent, ChannelEventKind, ChannelObserver};
pub use engine_config::EngineConfig;
pub use engine_event::{EngineEvent, IceGatheringState};
pub use webrtc_channel::WebRtcDataChannel;
pub use webrtc_engine::WebRtcEngine;

use crate::EngineError;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use tether_core::{IceCandidate, SessionDescription};

/// Operations the session needs from the engine. Each completes exactly once.
#[async_trait]
pub trait MediaEngine: Send + Sync {
    async fn create_offer(&self) -> Result<SessionDescription, EngineError>;

    async fn create_answer(&self) -> Result<SessionDescription, EngineError>;

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), EngineError>;

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<(), EngineError>;

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), EngineError>;

    /// Create a channel that is announced to the remote peer through SDP.
    async fn create_data_channel(&self, label: &str) -> Result<Arc<dyn DataChannel>, EngineError>;

    /// Release the peer connection. Called once, after the event loop stops.
    async fn close(&self) -> Result<(), EngineError>;
}

/// Engine-side auxiliary channel.
#[async_trait]
pub trait DataChannel: Send + Sync {
    fn label(&self) -> &str;

    /// Route open/close/error/message notifications of this channel to `observer`.
    fn observe(&self, observer: ChannelObserver);

    async fn send_text(&self, text: &str) -> Result<(), EngineError>;

    async fn send_binary(&self, data: Bytes) -> Result<(), EngineError>;
}
