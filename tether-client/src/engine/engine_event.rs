use crate::engine::DataChannel;
use std::fmt;
use std::sync::Arc;
use tether_core::IceCandidate;

/// Unsolicited notifications raised by the media engine.
pub enum EngineEvent {
    NegotiationNeeded,
    IceCandidateGenerated(IceCandidate),
    /// A channel opened by the remote peer.
    DataChannelCreated(Arc<dyn DataChannel>),
    IceGatheringStateChanged(IceGatheringState),
    /// The engine cannot continue (e.g. the peer connection failed).
    Failed(String),
}

impl fmt::Debug for EngineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineEvent::NegotiationNeeded => f.write_str("NegotiationNeeded"),
            EngineEvent::IceCandidateGenerated(c) => {
                f.debug_tuple("IceCandidateGenerated").field(c).finish()
            }
            EngineEvent::DataChannelCreated(dc) => {
                f.debug_tuple("DataChannelCreated").field(&dc.label()).finish()
            }
            EngineEvent::IceGatheringStateChanged(s) => {
                f.debug_tuple("IceGatheringStateChanged").field(s).finish()
            }
            EngineEvent::Failed(reason) => f.debug_tuple("Failed").field(reason).finish(),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum IceGatheringState {
    New,
    Gathering,
    Complete,
    Unknown,
}

impl fmt::Display for IceGatheringState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IceGatheringState::New => "new",
            IceGatheringState::Gathering => "gathering",
            IceGatheringState::Complete => "complete",
            IceGatheringState::Unknown => "unknown",
        })
    }
}
