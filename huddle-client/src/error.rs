use crate::session::NegotiationState;
use huddle_core::{ParticipantId, RoomId, SignalingError};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot {operation} while {state}")]
    InvalidTransition {
        operation: &'static str,
        state: NegotiationState,
    },

    #[error(transparent)]
    Malformed(#[from] SignalingError),

    #[error("a session with {0} is already active")]
    AlreadyActive(ParticipantId),
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("local media unavailable: {0}")]
    CaptureUnavailable(String),

    #[error("no peer connection for {0}")]
    NoPeerConnection(ParticipantId),

    #[error("webrtc error: {0}")]
    WebRtc(#[from] webrtc::Error),

    #[error("media engine error: {0}")]
    Engine(String),
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Signaling(#[from] SignalingError),

    #[error("no pending call from {0}")]
    NoPendingCall(ParticipantId),

    #[error("no session with {0}")]
    NoSession(ParticipantId),

    #[error("no pending invite to room {0}")]
    NoPendingInvite(RoomId),

    #[error("not a member of room {0}")]
    NotInRoom(RoomId),

    #[error("signaling channel closed")]
    ChannelClosed,

    #[error("call agent stopped")]
    AgentStopped,
}
