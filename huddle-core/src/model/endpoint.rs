use std::fmt;
use uuid::Uuid;

/// Identity of one live transport connection. A participant that reconnects
/// gets a new endpoint id while keeping its [`ParticipantId`](super::ParticipantId).
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct EndpointId(pub Uuid);

impl EndpointId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EndpointId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
