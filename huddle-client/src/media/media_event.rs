use huddle_core::{IceCandidate, ParticipantId};

/// Things the media layer reports back to the agent on its own schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaEvent {
    /// A local candidate was gathered for the connection to `peer`.
    LocalCandidate {
        peer: ParticipantId,
        candidate: IceCandidate,
    },
    Connected {
        peer: ParticipantId,
    },
    /// The connection to `peer` failed for good.
    Failed {
        peer: ParticipantId,
    },
}
