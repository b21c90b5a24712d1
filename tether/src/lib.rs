pub use tether_core::model::{IceCandidate, PeerId, SdpKind, SessionDescription, SignalingMessage};

pub mod model {
    pub use tether_core::model::*;
}

pub mod codec {
    pub use tether_core::codec::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use tether_client::*;
}
