use crate::EngineError;
use crate::engine::{
    DataChannel, EngineConfig, EngineEvent, IceGatheringState, MediaEngine, WebRtcDataChannel,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tether_core::{IceCandidate, SdpKind, SessionDescription};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine as CodecRegistry;
use webrtc::data_channel::RTCDataChannel;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_gatherer_state::RTCIceGathererState;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;

/// [`MediaEngine`] backed by a webrtc-rs peer connection.
pub struct WebRtcEngine {
    peer_connection: Arc<RTCPeerConnection>,
}

impl WebRtcEngine {
    /// Build the peer connection and wire its callbacks into `events`.
    pub async fn new(config: EngineConfig, events: mpsc::UnboundedSender<EngineEvent>) -> Result<Self> {
        let mut codecs = CodecRegistry::default();
        codecs.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut codecs)?;

        let api = APIBuilder::new()
            .with_media_engine(codecs)
            .with_interceptor_registry(registry)
            .build();

        let ice_servers = if config.ice_servers.is_empty() {
            vec![]
        } else {
            vec![RTCIceServer {
                urls: config.ice_servers,
                ..Default::default()
            }]
        };
        let rtc_config = RTCConfiguration {
            ice_servers,
            ..Default::default()
        };

        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);

        let negotiation_tx = events.clone();
        peer_connection.on_negotiation_needed(Box::new(move || {
            let tx = negotiation_tx.clone();
            Box::pin(async move {
                let _ = tx.send(EngineEvent::NegotiationNeeded);
            })
        }));

        let ice_tx = events.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            Box::pin(async move {
                // `None` marks the end of gathering, which the state callback reports.
                let Some(candidate) = c else { return };
                match candidate.to_json() {
                    Ok(init) => {
                        let candidate =
                            IceCandidate::new(init.sdp_mline_index.unwrap_or(0), init.candidate);
                        let _ = tx.send(EngineEvent::IceCandidateGenerated(candidate));
                    }
                    Err(e) => warn!("Failed to serialize local ICE candidate: {}", e),
                }
            })
        }));

        let gathering_tx = events.clone();
        peer_connection.on_ice_gathering_state_change(Box::new(move |s: RTCIceGathererState| {
            let tx = gathering_tx.clone();
            Box::pin(async move {
                let state = match s {
                    RTCIceGathererState::New => IceGatheringState::New,
                    RTCIceGathererState::Gathering => IceGatheringState::Gathering,
                    RTCIceGathererState::Complete => IceGatheringState::Complete,
                    _ => IceGatheringState::Unknown,
                };
                let _ = tx.send(EngineEvent::IceGatheringStateChanged(state));
            })
        }));

        let state_tx = events.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();
                Box::pin(async move {
                    info!("Peer connection state changed: {:?}", s);
                    if s == RTCPeerConnectionState::Failed {
                        let _ = tx.send(EngineEvent::Failed("peer connection failed".to_owned()));
                    }
                })
            },
        ));

        let dc_tx = events;
        peer_connection.on_data_channel(Box::new(move |dc: Arc<RTCDataChannel>| {
            let tx = dc_tx.clone();
            Box::pin(async move {
                debug!("Remote peer opened data channel '{}'", dc.label());
                let channel: Arc<dyn DataChannel> = Arc::new(WebRtcDataChannel::new(dc));
                let _ = tx.send(EngineEvent::DataChannelCreated(channel));
            })
        }));

        if config.video {
            peer_connection
                .add_transceiver_from_kind(RTPCodecType::Video, None)
                .await?;
        }

        Ok(Self { peer_connection })
    }
}

fn to_rtc(desc: SessionDescription) -> webrtc::error::Result<RTCSessionDescription> {
    match desc.kind {
        SdpKind::Offer => RTCSessionDescription::offer(desc.sdp),
        SdpKind::Answer => RTCSessionDescription::answer(desc.sdp),
    }
}

#[async_trait]
impl MediaEngine for WebRtcEngine {
    async fn create_offer(&self) -> Result<SessionDescription, EngineError> {
        let offer = self
            .peer_connection
            .create_offer(None)
            .await
            .map_err(|e| EngineError::new("create-offer", e))?;
        Ok(SessionDescription::offer(offer.sdp))
    }

    async fn create_answer(&self) -> Result<SessionDescription, EngineError> {
        let answer = self
            .peer_connection
            .create_answer(None)
            .await
            .map_err(|e| EngineError::new("create-answer", e))?;
        Ok(SessionDescription::answer(answer.sdp))
    }

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), EngineError> {
        let desc = to_rtc(desc).map_err(|e| EngineError::new("set-local-description", e))?;
        self.peer_connection
            .set_local_description(desc)
            .await
            .map_err(|e| EngineError::new("set-local-description", e))
    }

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<(), EngineError> {
        let desc = to_rtc(desc).map_err(|e| EngineError::new("set-remote-description", e))?;
        self.peer_connection
            .set_remote_description(desc)
            .await
            .map_err(|e| EngineError::new("set-remote-description", e))
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), EngineError> {
        let init = RTCIceCandidateInit {
            candidate: candidate.candidate,
            sdp_mline_index: Some(candidate.sdp_m_line_index),
            ..Default::default()
        };
        self.peer_connection
            .add_ice_candidate(init)
            .await
            .map_err(|e| EngineError::new("add-ice-candidate", e))
    }

    async fn create_data_channel(&self, label: &str) -> Result<Arc<dyn DataChannel>, EngineError> {
        let dc = self
            .peer_connection
            .create_data_channel(label, None)
            .await
            .map_err(|e| EngineError::new("create-data-channel", e))?;
        Ok(Arc::new(WebRtcDataChannel::new(dc)))
    }

    async fn close(&self) -> Result<(), EngineError> {
        self.peer_connection
            .close()
            .await
            .map_err(|e| EngineError::new("close", e))
    }
}
