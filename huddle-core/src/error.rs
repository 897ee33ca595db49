use crate::model::{ParticipantId, RoomId};
use std::fmt::Display;
use thiserror::Error;

/// Failures the relay and the endpoints report for a single envelope.
///
/// None of these is fatal: the offending envelope is dropped (or answered with
/// `user-offline`) and the connection stays up.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignalingError {
    #[error("participant {0} is not online")]
    UnknownDestination(ParticipantId),

    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("malformed {kind} payload: {reason}")]
    MalformedPayload { kind: &'static str, reason: String },

    #[error("unknown room {0}")]
    UnknownRoom(RoomId),

    #[error("room {0} already exists")]
    RoomExists(RoomId),

    #[error("{participant} is not a member of room {room_id}")]
    NotRoomMember {
        room_id: RoomId,
        participant: ParticipantId,
    },
}

impl SignalingError {
    pub fn malformed(reason: impl Display) -> Self {
        Self::MalformedEnvelope(reason.to_string())
    }

    pub fn malformed_payload(kind: &'static str, reason: impl Display) -> Self {
        Self::MalformedPayload {
            kind,
            reason: reason.to_string(),
        }
    }
}
