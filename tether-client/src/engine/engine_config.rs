/// Configuration for the WebRTC engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub ice_servers: Vec<String>,
    /// Add a video transceiver so the offer carries a video m-line.
    pub video: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec!["stun:stun.l.google.com:19302".to_owned()],
            video: true,
        }
    }
}
