use huddle_core::{IceServerConfig, ParticipantId, RoomId};
use serde_json::Value;

/// What a call agent reports to the application.
#[derive(Debug, Clone, PartialEq)]
pub enum CallEvent {
    IceConfig {
        ice_servers: Vec<IceServerConfig>,
    },
    IncomingCall {
        from: ParticipantId,
        room_id: RoomId,
        is_video: bool,
    },
    CallAccepted {
        peer: ParticipantId,
    },
    CallRejected {
        peer: ParticipantId,
    },
    CallEnded {
        peer: ParticipantId,
    },
    /// Both descriptions are in place for this peer.
    NegotiationComplete {
        peer: ParticipantId,
    },
    Connected {
        peer: ParticipantId,
    },
    NegotiationFailed {
        peer: ParticipantId,
        reason: String,
    },
    RoomInvite {
        room_id: RoomId,
        from: ParticipantId,
        is_video: bool,
    },
    ParticipantJoined {
        room_id: RoomId,
        participant: ParticipantId,
    },
    ParticipantLeft {
        room_id: RoomId,
        participant: ParticipantId,
    },
    RoomSignal {
        room_id: RoomId,
        from: ParticipantId,
        signal: Value,
    },
    PeerOffline {
        peer: ParticipantId,
    },
}
