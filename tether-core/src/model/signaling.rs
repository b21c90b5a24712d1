use crate::model::{IceCandidate, SdpKind, SessionDescription};

/// Every message exchanged with the relay.
///
/// Each variant carries exactly the payload its tag implies, so routing is an
/// exhaustive `match` instead of repeated key lookups on raw JSON.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SignalingMessage {
    SdpOffer { sdp: String },
    SdpAnswer { sdp: String },
    IceCandidate(IceCandidate),
}

impl SignalingMessage {
    /// The session description carried by an offer or answer.
    pub fn description(&self) -> Option<SessionDescription> {
        match self {
            SignalingMessage::SdpOffer { sdp } => Some(SessionDescription::offer(sdp.clone())),
            SignalingMessage::SdpAnswer { sdp } => Some(SessionDescription::answer(sdp.clone())),
            SignalingMessage::IceCandidate(_) => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            SignalingMessage::SdpOffer { .. } => "offer",
            SignalingMessage::SdpAnswer { .. } => "answer",
            SignalingMessage::IceCandidate(_) => "ice-candidate",
        }
    }
}

impl From<SessionDescription> for SignalingMessage {
    fn from(desc: SessionDescription) -> Self {
        match desc.kind {
            SdpKind::Offer => SignalingMessage::SdpOffer { sdp: desc.sdp },
            SdpKind::Answer => SignalingMessage::SdpAnswer { sdp: desc.sdp },
        }
    }
}

impl From<IceCandidate> for SignalingMessage {
    fn from(candidate: IceCandidate) -> Self {
        SignalingMessage::IceCandidate(candidate)
    }
}
