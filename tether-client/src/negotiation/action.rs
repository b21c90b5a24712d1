use crate::engine::MediaEngine;
use crate::EngineError;
use tether_core::{SdpKind, SessionDescription, SignalingMessage};

/// One asynchronous engine operation the negotiation is waiting on.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum EngineRequest {
    CreateOffer,
    CreateAnswer,
    SetLocalDescription(SessionDescription),
    SetRemoteDescription(SessionDescription),
}

impl EngineRequest {
    pub async fn run(self, engine: &dyn MediaEngine) -> Result<StepOutcome, EngineError> {
        match self {
            EngineRequest::CreateOffer => engine.create_offer().await.map(StepOutcome::OfferCreated),
            EngineRequest::CreateAnswer => {
                engine.create_answer().await.map(StepOutcome::AnswerCreated)
            }
            EngineRequest::SetLocalDescription(desc) => {
                engine.set_local_description(desc.clone()).await?;
                Ok(StepOutcome::LocalDescriptionSet(desc))
            }
            EngineRequest::SetRemoteDescription(desc) => {
                let kind = desc.kind;
                engine.set_remote_description(desc).await?;
                Ok(StepOutcome::RemoteDescriptionSet(kind))
            }
        }
    }
}

/// What the session must do next on behalf of the negotiation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum NegotiationAction {
    Engine(EngineRequest),
    Transmit(SignalingMessage),
}

/// Completion of an [`EngineRequest`], fed back into the controller.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum StepOutcome {
    OfferCreated(SessionDescription),
    AnswerCreated(SessionDescription),
    LocalDescriptionSet(SessionDescription),
    RemoteDescriptionSet(SdpKind),
}

impl StepOutcome {
    pub fn name(&self) -> &'static str {
        match self {
            StepOutcome::OfferCreated(_) => "offer-created",
            StepOutcome::AnswerCreated(_) => "answer-created",
            StepOutcome::LocalDescriptionSet(_) => "local-description-set",
            StepOutcome::RemoteDescriptionSet(_) => "remote-description-set",
        }
    }
}
