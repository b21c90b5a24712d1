use crate::engine::EngineConfig;
use crate::transport::RelayConfig;

pub const DEFAULT_CONTROL_CHANNEL_LABEL: &str = "channel";
pub const DEFAULT_GREETING: &str = "Data channel opened";

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub relay: RelayConfig,
    pub engine: EngineConfig,
    /// Label of the data channel created before negotiation starts.
    pub control_channel_label: String,
    /// Text sent on every channel as soon as it opens.
    pub greeting: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            relay: RelayConfig::default(),
            engine: EngineConfig::default(),
            control_channel_label: DEFAULT_CONTROL_CHANNEL_LABEL.to_owned(),
            greeting: DEFAULT_GREETING.to_owned(),
        }
    }
}
