use super::{SessionConfig, ShutdownSignal};
use crate::channel::{DataChannelManager, InboundMessage};
use crate::engine::{ChannelEvent, EngineEvent, MediaEngine};
use crate::ice::IceRelay;
use crate::negotiation::{
    EngineRequest, NegotiationAction, NegotiationController, NegotiationResult, NegotiationState,
    StepOutcome,
};
use crate::transport::{SignalingOutput, TransportEvent};
use crate::{EngineError, ShutdownReason};
use std::sync::Arc;
use std::time::Duration;
use tether_core::{DecodeError, MessageCodec, SessionDescription, SignalingMessage};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

/// How long teardown waits for the relay to confirm the close.
pub const RELAY_CLOSE_GRACE: Duration = Duration::from_secs(3);

type StepResult = Result<StepOutcome, EngineError>;

/// One signaling session: a single event loop owning every piece of state.
///
/// Relay frames, engine callbacks, channel events and completed engine
/// requests are all funnelled through channels into [`Session::run`], so
/// nothing here needs a lock.
pub struct Session {
    control_channel_label: String,
    relay: Arc<dyn SignalingOutput>,
    relay_rx: mpsc::UnboundedReceiver<TransportEvent>,
    engine: Arc<dyn MediaEngine>,
    engine_rx: mpsc::UnboundedReceiver<EngineEvent>,
    negotiation: NegotiationController,
    negotiation_state: watch::Sender<NegotiationState>,
    ice: IceRelay,
    channels: DataChannelManager,
    channel_rx: mpsc::UnboundedReceiver<ChannelEvent>,
    steps_tx: mpsc::UnboundedSender<StepResult>,
    steps_rx: mpsc::UnboundedReceiver<StepResult>,
    shutdown: ShutdownSignal,
}

impl Session {
    pub fn new(
        config: &SessionConfig,
        relay: Arc<dyn SignalingOutput>,
        relay_rx: mpsc::UnboundedReceiver<TransportEvent>,
        engine: Arc<dyn MediaEngine>,
        engine_rx: mpsc::UnboundedReceiver<EngineEvent>,
        shutdown: ShutdownSignal,
    ) -> Self {
        let (channel_tx, channel_rx) = mpsc::unbounded_channel();
        let (steps_tx, steps_rx) = mpsc::unbounded_channel();

        Self {
            control_channel_label: config.control_channel_label.clone(),
            ice: IceRelay::new(relay.clone(), engine.clone(), shutdown.clone()),
            channels: DataChannelManager::new(channel_tx, config.greeting.clone()),
            relay,
            relay_rx,
            engine,
            engine_rx,
            negotiation: NegotiationController::new(),
            negotiation_state: watch::channel(NegotiationState::Idle).0,
            channel_rx,
            steps_tx,
            steps_rx,
            shutdown,
        }
    }

    /// Forward text received on any data channel to `sink`.
    pub fn with_application_sink(mut self, sink: mpsc::UnboundedSender<InboundMessage>) -> Self {
        self.channels.set_application_sink(sink);
        self
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Follow negotiation progress while the session runs.
    pub fn watch_negotiation(&self) -> watch::Receiver<NegotiationState> {
        self.negotiation_state.subscribe()
    }

    /// Drive the session until something ends it, then tear down.
    pub async fn run(mut self) -> ShutdownReason {
        info!("Session event loop started");

        if let Err(e) = self
            .channels
            .open_control_channel(self.engine.as_ref(), &self.control_channel_label)
            .await
        {
            self.shutdown.trigger(e.into());
        }

        while !self.shutdown.is_triggered() {
            tokio::select! {
                _ = self.shutdown.triggered() => break,

                evt = self.relay_rx.recv() => {
                    match evt {
                        Some(e) => self.handle_transport_event(e),
                        None => {
                            warn!("Relay event channel closed unexpectedly");
                            self.shutdown.trigger(ShutdownReason::RelayClosed(None));
                        }
                    }
                }

                Some(evt) = self.engine_rx.recv() => self.handle_engine_event(evt),

                Some(evt) = self.channel_rx.recv() => {
                    if let Some(reason) = self.channels.handle_event(evt) {
                        self.shutdown.trigger(reason);
                    }
                }

                Some(step) = self.steps_rx.recv() => self.handle_step(step),
            }
        }

        self.teardown().await
    }

    fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Message(text) => self.handle_relay_message(&text),
            TransportEvent::Closed { reason } => {
                self.shutdown.trigger(ShutdownReason::RelayClosed(reason));
            }
        }
    }

    fn handle_relay_message(&mut self, text: &str) {
        match MessageCodec::decode(text) {
            Ok(message) => self.handle_signaling_message(message),
            Err(e) if e.is_fatal() => {
                self.shutdown.trigger(ShutdownReason::Protocol(e));
            }
            Err(DecodeError::UnknownShape(keys)) => {
                warn!("Ignoring unknown JSON message with keys {}: {}", keys, text);
            }
            Err(e) => warn!("Unknown message '{}', ignoring: {}", text, e),
        }
    }

    fn handle_signaling_message(&mut self, message: SignalingMessage) {
        match message {
            SignalingMessage::SdpOffer { sdp } => {
                info!("Received offer");
                debug!("Remote offer SDP:\n{}", sdp);
                let result = self
                    .negotiation
                    .remote_description(SessionDescription::offer(sdp));
                self.apply_negotiation(result);
            }
            SignalingMessage::SdpAnswer { sdp } => {
                info!("Received answer");
                debug!("Remote answer SDP:\n{}", sdp);
                let result = self
                    .negotiation
                    .remote_description(SessionDescription::answer(sdp));
                self.apply_negotiation(result);
            }
            SignalingMessage::IceCandidate(candidate) => self.ice.apply_remote(candidate),
        }
    }

    fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::NegotiationNeeded => {
                info!("On negotiation needed");
                let result = self.negotiation.negotiation_needed();
                self.apply_negotiation(result);
            }
            EngineEvent::IceCandidateGenerated(candidate) => self.ice.forward_local(candidate),
            EngineEvent::DataChannelCreated(channel) => {
                info!("Remote peer opened data channel '{}'", channel.label());
                self.channels.track(channel);
            }
            EngineEvent::IceGatheringStateChanged(state) => {
                info!("ICE gathering state changed to {}", state);
            }
            EngineEvent::Failed(reason) => {
                self.shutdown.trigger(ShutdownReason::Engine(EngineError::new(
                    "peer-connection",
                    reason,
                )));
            }
        }
    }

    fn handle_step(&mut self, step: StepResult) {
        match step {
            Ok(outcome) => {
                debug!("Engine step completed: {}", outcome.name());
                let result = self.negotiation.step_completed(outcome);
                self.apply_negotiation(result);
            }
            Err(e) => {
                self.shutdown.trigger(e.into());
            }
        }
    }

    /// Runs every action within the current loop turn, in order.
    fn apply_negotiation(&mut self, result: NegotiationResult) {
        let next = self.negotiation.state();
        self.negotiation_state
            .send_if_modified(|state| replace_if_changed(state, next));

        let actions = match result {
            Ok(actions) => actions,
            Err(e) => {
                warn!("{}", e);
                return;
            }
        };
        for action in actions {
            match action {
                NegotiationAction::Transmit(message) => {
                    info!("Sending {}", message.kind_name());
                    self.relay.send_message(&message);
                }
                NegotiationAction::Engine(request) => self.spawn_engine_request(request),
            }
        }
    }

    fn spawn_engine_request(&self, request: EngineRequest) {
        let engine = self.engine.clone();
        let steps_tx = self.steps_tx.clone();
        let liveness = self.shutdown.clone();

        tokio::spawn(async move {
            if liveness.is_triggered() {
                return;
            }
            let result = request.run(engine.as_ref()).await;
            if liveness.is_triggered() {
                return;
            }
            let _ = steps_tx.send(result);
        });
    }

    async fn teardown(self) -> ShutdownReason {
        let reason = self
            .shutdown
            .take_reason()
            .unwrap_or(ShutdownReason::Interrupted);

        if reason.is_orderly() {
            info!("{}", reason);
        } else {
            error!("{}", reason);
        }

        self.relay.close();
        if tokio::time::timeout(RELAY_CLOSE_GRACE, self.relay.closed())
            .await
            .is_err()
        {
            warn!("Relay did not confirm close within {:?}", RELAY_CLOSE_GRACE);
        }

        if let Err(e) = self.engine.close().await {
            warn!("Error closing media engine: {}", e);
        }

        info!("Session event loop finished");
        reason
    }
}

fn replace_if_changed(current: &mut NegotiationState, next: NegotiationState) -> bool {
    if *current == next {
        return false;
    }
    *current = next;
    true
}
