use crate::error::ClientError;
use huddle_core::{ParticipantId, RoomId};
use serde_json::Value;
use tokio::sync::oneshot;

pub type Reply<T> = oneshot::Sender<Result<T, ClientError>>;

/// Requests an `AgentHandle` sends into a running call agent.
#[derive(Debug)]
pub enum AgentCommand {
    Call {
        to: ParticipantId,
        is_video: bool,
        room_id: Option<RoomId>,
        reply: Reply<RoomId>,
    },
    Accept {
        from: ParticipantId,
        reply: Reply<()>,
    },
    Reject {
        from: ParticipantId,
        reply: Reply<()>,
    },
    HangUp {
        peer: ParticipantId,
        reply: Reply<()>,
    },
    CreateRoom {
        target: ParticipantId,
        is_video: bool,
        reply: Reply<RoomId>,
    },
    Invite {
        room_id: RoomId,
        target: ParticipantId,
        reply: Reply<()>,
    },
    AcceptInvite {
        room_id: RoomId,
        reply: Reply<()>,
    },
    JoinRoom {
        room_id: RoomId,
        is_video: bool,
        reply: Reply<()>,
    },
    LeaveRoom {
        room_id: RoomId,
        reply: Reply<()>,
    },
    RoomSignal {
        room_id: RoomId,
        signal: Value,
        reply: Reply<()>,
    },
}
