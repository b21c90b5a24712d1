mod candidate;
mod description;
mod peer;
mod signaling;

pub use candidate::IceCandidate;
pub use description::{SdpKind, SessionDescription};
pub use peer::PeerId;
pub use signaling::SignalingMessage;
