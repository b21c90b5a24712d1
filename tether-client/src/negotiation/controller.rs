use super::{EngineRequest, NegotiationAction, NegotiationError, StepOutcome};
use std::fmt;
use tether_core::{SdpKind, SessionDescription, SignalingMessage};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum NegotiationState {
    Idle,
    OfferCreated,
    LocalDescriptionSet,
    RemoteDescriptionSet,
    AnswerCreated,
    Negotiated,
}

impl fmt::Display for NegotiationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NegotiationState::Idle => "idle",
            NegotiationState::OfferCreated => "offer-created",
            NegotiationState::LocalDescriptionSet => "local-description-set",
            NegotiationState::RemoteDescriptionSet => "remote-description-set",
            NegotiationState::AnswerCreated => "answer-created",
            NegotiationState::Negotiated => "negotiated",
        })
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Role {
    Offerer,
    Answerer,
}

/// Offer/answer state machine for a single negotiation.
///
/// The controller never touches the engine or the relay. Each input returns the
/// actions to perform, in order. A local description is transmitted in the same
/// turn that its set-local request is issued, before any candidate the engine
/// gathers while applying it. At most one engine request is outstanding at a
/// time: an answer that arrives before the local description is acknowledged
/// is held until then.
#[derive(Debug)]
pub struct NegotiationController {
    state: NegotiationState,
    role: Option<Role>,
    remote_requested: bool,
    local_pending: bool,
    deferred_remote: Option<SessionDescription>,
}

pub type NegotiationResult = Result<Vec<NegotiationAction>, NegotiationError>;

impl Default for NegotiationController {
    fn default() -> Self {
        Self::new()
    }
}

impl NegotiationController {
    pub fn new() -> Self {
        Self {
            state: NegotiationState::Idle,
            role: None,
            remote_requested: false,
            local_pending: false,
            deferred_remote: None,
        }
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// The engine wants a (new) negotiation. Only the first one is honoured.
    pub fn negotiation_needed(&mut self) -> NegotiationResult {
        match (self.state, self.role) {
            (NegotiationState::Idle, None) => {
                self.role = Some(Role::Offerer);
                self.transition(NegotiationState::OfferCreated);
                Ok(vec![NegotiationAction::Engine(EngineRequest::CreateOffer)])
            }
            (NegotiationState::Negotiated, _) => Err(NegotiationError::Renegotiation),
            (state, _) => Err(NegotiationError::AlreadyNegotiating { state }),
        }
    }

    /// An offer or answer arrived from the remote peer.
    pub fn remote_description(&mut self, desc: SessionDescription) -> NegotiationResult {
        if self.remote_requested {
            return Err(NegotiationError::DuplicateRemoteDescription { kind: desc.kind });
        }

        let accepted = match (desc.kind, self.state, self.role) {
            (SdpKind::Offer, NegotiationState::Idle, None) => {
                self.role = Some(Role::Answerer);
                true
            }
            (SdpKind::Answer, NegotiationState::LocalDescriptionSet, Some(Role::Offerer)) => true,
            _ => false,
        };
        if !accepted {
            return Err(NegotiationError::UnexpectedDescription {
                kind: desc.kind,
                state: self.state,
                role: self.role,
            });
        }

        self.remote_requested = true;
        if self.local_pending {
            debug!("Holding {} until the local description is set", desc.kind);
            self.deferred_remote = Some(desc);
            return Ok(vec![]);
        }
        Ok(vec![NegotiationAction::Engine(
            EngineRequest::SetRemoteDescription(desc),
        )])
    }

    /// An engine request finished successfully.
    pub fn step_completed(&mut self, outcome: StepOutcome) -> NegotiationResult {
        let step = outcome.name();
        match (outcome, self.state, self.role) {
            (
                StepOutcome::OfferCreated(offer),
                NegotiationState::OfferCreated,
                Some(Role::Offerer),
            ) if offer.kind == SdpKind::Offer => {
                self.transition(NegotiationState::LocalDescriptionSet);
                Ok(self.apply_local(offer))
            }
            (StepOutcome::LocalDescriptionSet(desc), state, role)
                if self.local_pending && role.map(local_kind) == Some(desc.kind) =>
            {
                debug!("Local {} applied while {}", desc.kind, state);
                self.local_pending = false;
                Ok(self
                    .deferred_remote
                    .take()
                    .map(|remote| {
                        NegotiationAction::Engine(EngineRequest::SetRemoteDescription(remote))
                    })
                    .into_iter()
                    .collect())
            }
            (
                StepOutcome::RemoteDescriptionSet(SdpKind::Answer),
                NegotiationState::LocalDescriptionSet,
                Some(Role::Offerer),
            ) => {
                self.transition(NegotiationState::RemoteDescriptionSet);
                self.transition(NegotiationState::Negotiated);
                Ok(vec![])
            }
            (
                StepOutcome::RemoteDescriptionSet(SdpKind::Offer),
                NegotiationState::Idle,
                Some(Role::Answerer),
            ) => {
                self.transition(NegotiationState::RemoteDescriptionSet);
                Ok(vec![NegotiationAction::Engine(EngineRequest::CreateAnswer)])
            }
            (
                StepOutcome::AnswerCreated(answer),
                NegotiationState::RemoteDescriptionSet,
                Some(Role::Answerer),
            ) if answer.kind == SdpKind::Answer => {
                self.transition(NegotiationState::AnswerCreated);
                let actions = self.apply_local(answer);
                self.transition(NegotiationState::LocalDescriptionSet);
                self.transition(NegotiationState::Negotiated);
                Ok(actions)
            }
            (_, state, _) => Err(NegotiationError::UnexpectedStep { step, state }),
        }
    }

    /// Request set-local and transmit the description without waiting for the ack.
    fn apply_local(&mut self, desc: SessionDescription) -> Vec<NegotiationAction> {
        self.local_pending = true;
        vec![
            NegotiationAction::Engine(EngineRequest::SetLocalDescription(desc.clone())),
            NegotiationAction::Transmit(SignalingMessage::from(desc)),
        ]
    }

    fn transition(&mut self, next: NegotiationState) {
        info!("Negotiation state: {} -> {}", self.state, next);
        self.state = next;
    }
}

fn local_kind(role: Role) -> SdpKind {
    match role {
        Role::Offerer => SdpKind::Offer,
        Role::Answerer => SdpKind::Answer,
    }
}
