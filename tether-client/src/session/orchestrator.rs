use super::{Session, SessionConfig, ShutdownSignal};
use crate::engine::{MediaEngine, WebRtcEngine};
use crate::transport::RelayConnection;
use crate::{EngineError, ShutdownReason};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Wires a real relay connection and peer connection into a [`Session`].
pub struct SessionOrchestrator {
    config: SessionConfig,
    shutdown: ShutdownSignal,
}

impl SessionOrchestrator {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            shutdown: ShutdownSignal::new(),
        }
    }

    /// Handle for ending the session from outside, e.g. on Ctrl-C.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    pub async fn run(self) -> ShutdownReason {
        info!("Starting session as '{}'", self.config.relay.peer_id);

        let (engine_tx, engine_rx) = mpsc::unbounded_channel();
        let engine = match WebRtcEngine::new(self.config.engine.clone(), engine_tx).await {
            Ok(engine) => Arc::new(engine),
            Err(e) => {
                return self.abort(EngineError::new("create-peer-connection", e).into());
            }
        };

        let connected = tokio::select! {
            result = RelayConnection::connect(&self.config.relay) => result,
            _ = self.shutdown.triggered() => {
                Self::close_engine(engine.as_ref()).await;
                return self.abort(ShutdownReason::Interrupted);
            }
        };
        let (relay, relay_rx) = match connected {
            Ok(connected) => connected,
            Err(e) => {
                Self::close_engine(engine.as_ref()).await;
                return self.abort(e.into());
            }
        };

        Session::new(
            &self.config,
            Arc::new(relay),
            relay_rx,
            engine,
            engine_rx,
            self.shutdown.clone(),
        )
        .run()
        .await
    }

    fn abort(&self, reason: ShutdownReason) -> ShutdownReason {
        self.shutdown.trigger(reason);
        let reason = self
            .shutdown
            .take_reason()
            .unwrap_or(ShutdownReason::Interrupted);

        if reason.is_orderly() {
            info!("{}", reason);
        } else {
            error!("{}", reason);
        }
        reason
    }

    async fn close_engine(engine: &dyn MediaEngine) {
        if let Err(e) = engine.close().await {
            warn!("Error closing media engine: {}", e);
        }
    }
}
