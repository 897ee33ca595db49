mod candidate;
mod description;
mod endpoint;
mod participant;
mod room;
mod signaling;

pub use candidate::IceCandidate;
pub use description::{SdpKind, SessionDescription};
pub use endpoint::EndpointId;
pub use participant::ParticipantId;
pub use room::RoomId;
pub use signaling::{IceServerConfig, Route, SignalEnvelope};
