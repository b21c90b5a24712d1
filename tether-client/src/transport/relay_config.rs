use crate::TransportError;
use std::time::Duration;
use tether_core::PeerId;
use url::Url;

pub const DEFAULT_RELAY_URL: &str = "ws://localhost:8888";
pub const DEFAULT_PEER_ID: &str = "streamer";
pub const CLIENT_ID_PARAM: &str = "client_id";

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub url: String,
    pub peer_id: PeerId,
    pub connect_timeout: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_RELAY_URL.to_owned(),
            peer_id: PeerId::from(DEFAULT_PEER_ID),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl RelayConfig {
    /// Relay URL with `client_id=<peer_id>` set, replacing any existing value.
    pub fn endpoint(&self) -> Result<Url, TransportError> {
        let mut url = Url::parse(&self.url).map_err(|e| TransportError::InvalidUrl {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(TransportError::InvalidUrl {
                url: self.url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        let retained: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != CLIENT_ID_PARAM)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        url.query_pairs_mut()
            .clear()
            .extend_pairs(retained)
            .append_pair(CLIENT_ID_PARAM, self.peer_id.as_str());

        Ok(url)
    }
}
