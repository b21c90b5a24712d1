/// Connectivity candidate plus the index of the media line it belongs to.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct IceCandidate {
    pub sdp_m_line_index: u16,
    pub candidate: String,
}

impl IceCandidate {
    pub fn new(sdp_m_line_index: u16, candidate: impl Into<String>) -> Self {
        Self {
            sdp_m_line_index,
            candidate: candidate.into(),
        }
    }
}
