use crate::error::SignalingError;
use crate::model::participant::ParticipantId;
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

/// Every message exchanged over the signaling channel.
///
/// Wire form is `{"op": "<kind>", "d": {..camelCase fields..}}`. Session
/// descriptions, candidates and room signals travel as opaque JSON values so the
/// relay can forward them without decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "op",
    content = "d",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum SignalEnvelope {
    Join {
        participant_id: ParticipantId,
    },
    IceConfig {
        ice_servers: Vec<IceServerConfig>,
    },
    CallIntent {
        to: ParticipantId,
        from: ParticipantId,
        is_video: bool,
        room_id: RoomId,
    },
    IncomingCall {
        to: ParticipantId,
        from: ParticipantId,
        is_video: bool,
        room_id: RoomId,
    },
    Offer {
        to: ParticipantId,
        from: ParticipantId,
        description: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        room_id: Option<RoomId>,
    },
    Answer {
        to: ParticipantId,
        from: ParticipantId,
        description: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        room_id: Option<RoomId>,
    },
    Candidate {
        to: ParticipantId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from: Option<ParticipantId>,
        candidate: Value,
    },
    Accept {
        to: ParticipantId,
        from: ParticipantId,
    },
    Reject {
        to: ParticipantId,
        from: ParticipantId,
    },
    End {
        to: ParticipantId,
        from: ParticipantId,
    },
    CreateRoom {
        room_id: RoomId,
        creator: ParticipantId,
        target: ParticipantId,
        is_video: bool,
    },
    AddParticipant {
        room_id: RoomId,
        from: ParticipantId,
        target: ParticipantId,
        is_video: bool,
    },
    JoinRoom {
        room_id: RoomId,
        user_id: ParticipantId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        is_video: Option<bool>,
    },
    LeaveRoom {
        room_id: RoomId,
        user_id: ParticipantId,
    },
    RoomSignal {
        room_id: RoomId,
        from: ParticipantId,
        signal: Value,
    },
    UserOffline {
        user_id: ParticipantId,
    },
}

/// Where the relay sends an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    /// Forwarded verbatim to a single participant.
    Direct(&'a ParticipantId),
    /// Fanned out to every room member except the sender.
    Room(&'a RoomId),
    /// Interpreted by the relay itself.
    Relay,
    /// Only the relay may emit it; clients sending it are misbehaving.
    RelayOriginated,
}

impl SignalEnvelope {
    /// Parses a text frame and rejects envelopes with blank identifiers.
    pub fn from_json(text: &str) -> Result<Self, SignalingError> {
        let envelope: Self = serde_json::from_str(text).map_err(SignalingError::malformed)?;
        envelope.validate()?;
        Ok(envelope)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::IceConfig { .. } => "ice-config",
            Self::CallIntent { .. } => "call-intent",
            Self::IncomingCall { .. } => "incoming-call",
            Self::Offer { .. } => "offer",
            Self::Answer { .. } => "answer",
            Self::Candidate { .. } => "candidate",
            Self::Accept { .. } => "accept",
            Self::Reject { .. } => "reject",
            Self::End { .. } => "end",
            Self::CreateRoom { .. } => "create-room",
            Self::AddParticipant { .. } => "add-participant",
            Self::JoinRoom { .. } => "join-room",
            Self::LeaveRoom { .. } => "leave-room",
            Self::RoomSignal { .. } => "room-signal",
            Self::UserOffline { .. } => "user-offline",
        }
    }

    /// The participant the envelope claims to come from.
    pub fn sender(&self) -> Option<&ParticipantId> {
        match self {
            Self::Join { participant_id } => Some(participant_id),
            Self::CallIntent { from, .. }
            | Self::IncomingCall { from, .. }
            | Self::Offer { from, .. }
            | Self::Answer { from, .. }
            | Self::Accept { from, .. }
            | Self::Reject { from, .. }
            | Self::End { from, .. }
            | Self::AddParticipant { from, .. }
            | Self::RoomSignal { from, .. } => Some(from),
            Self::Candidate { from, .. } => from.as_ref(),
            Self::CreateRoom { creator, .. } => Some(creator),
            Self::JoinRoom { user_id, .. } | Self::LeaveRoom { user_id, .. } => Some(user_id),
            Self::IceConfig { .. } | Self::UserOffline { .. } => None,
        }
    }

    pub fn route(&self) -> Route<'_> {
        match self {
            Self::Offer { to, .. }
            | Self::Answer { to, .. }
            | Self::Candidate { to, .. }
            | Self::Accept { to, .. }
            | Self::Reject { to, .. }
            | Self::End { to, .. } => Route::Direct(to),
            Self::JoinRoom { room_id, .. }
            | Self::LeaveRoom { room_id, .. }
            | Self::RoomSignal { room_id, .. } => Route::Room(room_id),
            Self::Join { .. }
            | Self::CallIntent { .. }
            | Self::CreateRoom { .. }
            | Self::AddParticipant { .. } => Route::Relay,
            Self::IceConfig { .. } | Self::IncomingCall { .. } | Self::UserOffline { .. } => {
                Route::RelayOriginated
            }
        }
    }

    /// The room an envelope refers to, if any.
    pub fn room_id(&self) -> Option<&RoomId> {
        match self {
            Self::CallIntent { room_id, .. }
            | Self::IncomingCall { room_id, .. }
            | Self::CreateRoom { room_id, .. }
            | Self::AddParticipant { room_id, .. }
            | Self::JoinRoom { room_id, .. }
            | Self::LeaveRoom { room_id, .. }
            | Self::RoomSignal { room_id, .. } => Some(room_id),
            Self::Offer { room_id, .. } | Self::Answer { room_id, .. } => room_id.as_ref(),
            _ => None,
        }
    }

    fn validate(&self) -> Result<(), SignalingError> {
        if self.sender().is_some_and(ParticipantId::is_blank) {
            return Err(SignalingError::malformed(format!(
                "{} has a blank sender",
                self.kind()
            )));
        }

        let destination = match self {
            Self::CreateRoom { target, .. } | Self::AddParticipant { target, .. } => Some(target),
            Self::CallIntent { to, .. } | Self::IncomingCall { to, .. } => Some(to),
            Self::UserOffline { user_id } => Some(user_id),
            other => match other.route() {
                Route::Direct(to) => Some(to),
                _ => None,
            },
        };
        if destination.is_some_and(ParticipantId::is_blank) {
            return Err(SignalingError::malformed(format!(
                "{} has a blank destination",
                self.kind()
            )));
        }

        if self.room_id().is_some_and(|r| r.as_str().trim().is_empty()) {
            return Err(SignalingError::malformed(format!(
                "{} has a blank room id",
                self.kind()
            )));
        }

        Ok(())
    }
}
