mod error;

pub mod channel;
pub mod engine;
pub mod ice;
pub mod negotiation;
pub mod session;
pub mod transport;

pub use channel::{ChannelId, ChannelState, DataChannelManager, InboundMessage};
pub use engine::{
    ChannelEvent, ChannelEventKind, ChannelObserver, DataChannel, EngineConfig, EngineEvent,
    IceGatheringState, MediaEngine, WebRtcEngine,
};
pub use error::{EngineError, ShutdownReason, TransportError};
pub use ice::IceRelay;
pub use negotiation::{
    EngineRequest, NegotiationAction, NegotiationController, NegotiationError, NegotiationResult,
    NegotiationState, Role, StepOutcome,
};
pub use session::{Session, SessionConfig, SessionOrchestrator, ShutdownSignal};
pub use transport::{RelayConfig, RelayConnection, RelayState, SignalingOutput, TransportEvent};

pub use tether_core::{IceCandidate, MessageCodec, PeerId, SdpKind, SessionDescription, SignalingMessage};
