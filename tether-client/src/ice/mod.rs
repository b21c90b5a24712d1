use crate::engine::MediaEngine;
use crate::session::ShutdownSignal;
use crate::transport::SignalingOutput;
use std::sync::Arc;
use tether_core::{IceCandidate, SignalingMessage};
use tracing::{debug, warn};

/// Trickles candidates in both directions, independently of negotiation.
///
/// Nothing is buffered or reordered: local candidates go out as soon as the
/// engine produces them and remote ones are handed to the engine on arrival.
pub struct IceRelay {
    output: Arc<dyn SignalingOutput>,
    engine: Arc<dyn MediaEngine>,
    liveness: ShutdownSignal,
}

impl IceRelay {
    pub fn new(
        output: Arc<dyn SignalingOutput>,
        engine: Arc<dyn MediaEngine>,
        liveness: ShutdownSignal,
    ) -> Self {
        Self {
            output,
            engine,
            liveness,
        }
    }

    pub fn forward_local(&self, candidate: IceCandidate) {
        debug!(
            "Sending local ICE candidate (mline {}): {}",
            candidate.sdp_m_line_index, candidate.candidate
        );
        self.output
            .send_message(&SignalingMessage::IceCandidate(candidate));
    }

    /// Candidates for a description that is not set yet are the engine's concern.
    pub fn apply_remote(&self, candidate: IceCandidate) {
        debug!(
            "Adding remote ICE candidate (mline {}): {}",
            candidate.sdp_m_line_index, candidate.candidate
        );
        let engine = self.engine.clone();
        let liveness = self.liveness.clone();
        tokio::spawn(async move {
            if liveness.is_triggered() {
                return;
            }
            if let Err(e) = engine.add_ice_candidate(candidate).await {
                warn!("Error adding ICE candidate: {}", e);
            }
        });
    }
}
