//! JSON framing of [`SignalingMessage`] on the relay connection.
//!
//! Inbound and outbound candidates use different envelopes:
//!
//! | Message | Shape |
//! |---|---|
//! | SDP | `{"sdp": {"type": "offer"\|"answer", "sdp": "..."}}` |
//! | inbound candidate | `{"candidate": {"candidate": "...", "sdpMLineIndex": 0}}` |
//! | outbound candidate | `{"type": "new-ice-candidate", "ice": {"candidate": "...", "sdpMLineIndex": 0}}` |
//!
//! The paired peer expects exactly these shapes, so they must not be unified.

mod error;
mod wire;

pub use error::DecodeError;

use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::model::{IceCandidate, SdpKind, SignalingMessage};
use wire::{CandidatePayload, SdpPayload};

pub const NEW_ICE_CANDIDATE: &str = "new-ice-candidate";

const SDP_KEY: &str = "sdp";
const CANDIDATE_KEY: &str = "candidate";
const TYPE_KEY: &str = "type";
const ICE_KEY: &str = "ice";

pub struct MessageCodec;

impl MessageCodec {
    /// Serialize a message into its wire text. Never fails.
    pub fn encode(message: &SignalingMessage) -> String {
        let value = match message {
            SignalingMessage::SdpOffer { sdp } => sdp_envelope(SdpKind::Offer, sdp),
            SignalingMessage::SdpAnswer { sdp } => sdp_envelope(SdpKind::Answer, sdp),
            SignalingMessage::IceCandidate(candidate) => json!({
                TYPE_KEY: NEW_ICE_CANDIDATE,
                ICE_KEY: {
                    "candidate": candidate.candidate,
                    "sdpMLineIndex": candidate.sdp_m_line_index,
                },
            }),
        };
        value.to_string()
    }

    /// Parse one relay frame.
    ///
    /// Only [`DecodeError::MissingSdpType`] is fatal; every other error means
    /// the frame should be logged and dropped.
    pub fn decode(text: &str) -> Result<SignalingMessage, DecodeError> {
        let value: Value = serde_json::from_str(text).map_err(DecodeError::Malformed)?;
        let Value::Object(object) = value else {
            return Err(DecodeError::NotAnObject);
        };

        if let Some(payload) = object.get(SDP_KEY) {
            return decode_sdp(payload);
        }

        if let Some(payload) = object.get(CANDIDATE_KEY) {
            return decode_candidate(payload);
        }

        // Our own outbound framing, accepted so a message always survives a
        // round trip through the codec.
        if object.get(TYPE_KEY).and_then(Value::as_str) == Some(NEW_ICE_CANDIDATE) {
            if let Some(payload) = object.get(ICE_KEY) {
                return decode_candidate(payload);
            }
        }

        Err(DecodeError::UnknownShape(describe_keys(&object)))
    }
}

fn sdp_envelope(kind: SdpKind, sdp: &str) -> Value {
    json!({
        SDP_KEY: {
            TYPE_KEY: kind.as_str(),
            SDP_KEY: sdp,
        }
    })
}

fn decode_sdp(payload: &Value) -> Result<SignalingMessage, DecodeError> {
    let Value::Object(fields) = payload else {
        return Err(DecodeError::InvalidPayload {
            kind: "sdp",
            reason: "expected an object".to_owned(),
        });
    };
    if !fields.contains_key(TYPE_KEY) {
        return Err(DecodeError::MissingSdpType);
    }

    let payload = SdpPayload::deserialize(payload).map_err(|e| DecodeError::InvalidPayload {
        kind: "sdp",
        reason: e.to_string(),
    })?;

    match SdpKind::from_wire(&payload.kind) {
        Some(SdpKind::Offer) => Ok(SignalingMessage::SdpOffer { sdp: payload.sdp }),
        Some(SdpKind::Answer) => Ok(SignalingMessage::SdpAnswer { sdp: payload.sdp }),
        None => Err(DecodeError::UnsupportedSdpType(payload.kind)),
    }
}

fn decode_candidate(payload: &Value) -> Result<SignalingMessage, DecodeError> {
    let payload =
        CandidatePayload::deserialize(payload).map_err(|e| DecodeError::InvalidPayload {
            kind: "candidate",
            reason: e.to_string(),
        })?;

    Ok(SignalingMessage::IceCandidate(IceCandidate::new(
        payload.sdp_m_line_index,
        payload.candidate,
    )))
}

fn describe_keys(object: &Map<String, Value>) -> String {
    let keys: Vec<&str> = object.keys().map(String::as_str).collect();
    format!("{{{}}}", keys.join(", "))
}
