use serde::Deserialize;

#[derive(Deserialize)]
pub(super) struct SdpPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub sdp: String,
}

#[derive(Deserialize)]
pub(super) struct CandidatePayload {
    pub candidate: String,
    #[serde(rename = "sdpMLineIndex")]
    pub sdp_m_line_index: u16,
}
