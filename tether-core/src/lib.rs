pub mod codec;
pub mod model;

pub use codec::{DecodeError, MessageCodec};
pub use model::{IceCandidate, PeerId, SdpKind, SessionDescription, SignalingMessage};
