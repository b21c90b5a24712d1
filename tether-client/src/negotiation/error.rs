use super::{NegotiationState, Role};
use tether_core::SdpKind;
use thiserror::Error;

/// An input the controller refused. None of these end the session.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum NegotiationError {
    #[error("negotiation already in progress ({state}), ignoring negotiation-needed")]
    AlreadyNegotiating { state: NegotiationState },

    #[error("renegotiation is not supported, ignoring negotiation-needed")]
    Renegotiation,

    #[error("received {kind} while {state} as {role:?}, ignoring")]
    UnexpectedDescription {
        kind: SdpKind,
        state: NegotiationState,
        role: Option<Role>,
    },

    #[error("remote description already set, ignoring {kind}")]
    DuplicateRemoteDescription { kind: SdpKind },

    #[error("unexpected {step} completion while {state}")]
    UnexpectedStep {
        step: &'static str,
        state: NegotiationState,
    },
}
