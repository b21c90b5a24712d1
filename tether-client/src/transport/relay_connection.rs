use crate::TransportError;
use crate::transport::{RelayConfig, RelayState, SignalingOutput, TransportEvent};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tracing::{debug, info, warn};

enum Outbound {
    Frame(String),
    Close,
}

/// The single websocket connection to the relay.
///
/// Reading and writing run on two spawned tasks; inbound frames and the final
/// close are reported through the [`TransportEvent`] receiver returned by
/// [`RelayConnection::connect`].
pub struct RelayConnection {
    endpoint: String,
    state: Arc<watch::Sender<RelayState>>,
    outbound: mpsc::UnboundedSender<Outbound>,
}

impl RelayConnection {
    pub async fn connect(
        config: &RelayConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<TransportEvent>), TransportError> {
        let endpoint = config.endpoint()?.to_string();
        info!("Connecting to server {}...", endpoint);

        let connecting = connect_async(endpoint.as_str());
        let (socket, _response) = match tokio::time::timeout(config.connect_timeout, connecting).await
        {
            Ok(Ok(connected)) => connected,
            Ok(Err(e)) => {
                return Err(TransportError::Connect {
                    url: endpoint,
                    reason: e.to_string(),
                });
            }
            Err(_) => {
                return Err(TransportError::ConnectTimeout {
                    url: endpoint,
                    secs: config.connect_timeout.as_secs(),
                });
            }
        };
        info!("Connected to signalling server");

        let (mut sink, mut stream) = socket.split();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Outbound>();
        let (state, _) = watch::channel(RelayState::Open);
        let state = Arc::new(state);

        tokio::spawn(async move {
            while let Some(outbound) = outbound_rx.recv().await {
                match outbound {
                    Outbound::Frame(text) => {
                        if let Err(e) = sink.send(Message::Text(text.into())).await {
                            warn!("Failed to send frame to relay: {}", e);
                            break;
                        }
                    }
                    Outbound::Close => {
                        let frame = CloseFrame {
                            code: CloseCode::Normal,
                            reason: "".into(),
                        };
                        if let Err(e) = sink.send(Message::Close(Some(frame))).await {
                            debug!("Close frame not delivered: {}", e);
                        }
                        break;
                    }
                }
            }
        });

        let reader_state = state.clone();
        tokio::spawn(async move {
            let mut reason = None;
            while let Some(frame) = stream.next().await {
                match frame {
                    Ok(Message::Text(text)) => {
                        let _ = event_tx.send(TransportEvent::Message(text.as_str().to_owned()));
                    }
                    Ok(Message::Binary(data)) => match String::from_utf8(data.to_vec()) {
                        Ok(text) => {
                            let _ = event_tx.send(TransportEvent::Message(text));
                        }
                        Err(_) => warn!("Ignoring non UTF-8 binary frame ({} bytes)", data.len()),
                    },
                    Ok(Message::Close(frame)) => {
                        reason = frame.map(|f| f.reason.to_string());
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        reason = Some(e.to_string());
                        break;
                    }
                }
            }
            reader_state.send_replace(RelayState::Closed);
            let _ = event_tx.send(TransportEvent::Closed { reason });
        });

        let connection = Self {
            endpoint,
            state,
            outbound: outbound_tx,
        };
        Ok((connection, event_rx))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SignalingOutput for RelayConnection {
    fn state(&self) -> RelayState {
        *self.state.borrow()
    }

    fn send_text(&self, text: String) {
        let state = self.state();
        if state != RelayState::Open {
            warn!("Dropping frame, relay connection is {}", state);
            return;
        }
        debug!("Sending to relay: {}", text);
        if self.outbound.send(Outbound::Frame(text)).is_err() {
            warn!("Relay writer is gone, frame dropped");
        }
    }

    fn close(&self) {
        let requested = self.state.send_if_modified(|state| {
            if *state == RelayState::Open {
                *state = RelayState::Closing;
                true
            } else {
                false
            }
        });
        if requested {
            info!("Closing relay connection");
            let _ = self.outbound.send(Outbound::Close);
        }
    }

    async fn closed(&self) {
        let mut rx = self.state.subscribe();
        let _ = rx.wait_for(|state| *state == RelayState::Closed).await;
    }
}
