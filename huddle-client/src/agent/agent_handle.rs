use crate::agent::AgentCommand;
use crate::error::ClientError;
use huddle_core::{ParticipantId, RoomId};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

/// Cloneable front door to a spawned `CallAgent`.
#[derive(Debug, Clone)]
pub struct AgentHandle {
    commands: mpsc::Sender<AgentCommand>,
}

impl AgentHandle {
    pub(crate) fn new(commands: mpsc::Sender<AgentCommand>) -> Self {
        Self { commands }
    }

    pub async fn call(
        &self,
        to: ParticipantId,
        is_video: bool,
        room_id: Option<RoomId>,
    ) -> Result<RoomId, ClientError> {
        self.request(|reply| AgentCommand::Call {
            to,
            is_video,
            room_id,
            reply,
        })
        .await
    }

    pub async fn accept(&self, from: ParticipantId) -> Result<(), ClientError> {
        self.request(|reply| AgentCommand::Accept { from, reply })
            .await
    }

    pub async fn reject(&self, from: ParticipantId) -> Result<(), ClientError> {
        self.request(|reply| AgentCommand::Reject { from, reply })
            .await
    }

    pub async fn hang_up(&self, peer: ParticipantId) -> Result<(), ClientError> {
        self.request(|reply| AgentCommand::HangUp { peer, reply })
            .await
    }

    pub async fn create_room(
        &self,
        target: ParticipantId,
        is_video: bool,
    ) -> Result<RoomId, ClientError> {
        self.request(|reply| AgentCommand::CreateRoom {
            target,
            is_video,
            reply,
        })
        .await
    }

    pub async fn invite(&self, room_id: RoomId, target: ParticipantId) -> Result<(), ClientError> {
        self.request(|reply| AgentCommand::Invite {
            room_id,
            target,
            reply,
        })
        .await
    }

    pub async fn accept_invite(&self, room_id: RoomId) -> Result<(), ClientError> {
        self.request(|reply| AgentCommand::AcceptInvite { room_id, reply })
            .await
    }

    pub async fn join_room(&self, room_id: RoomId, is_video: bool) -> Result<(), ClientError> {
        self.request(|reply| AgentCommand::JoinRoom {
            room_id,
            is_video,
            reply,
        })
        .await
    }

    pub async fn leave_room(&self, room_id: RoomId) -> Result<(), ClientError> {
        self.request(|reply| AgentCommand::LeaveRoom { room_id, reply })
            .await
    }

    pub async fn send_room_signal(&self, room_id: RoomId, signal: Value) -> Result<(), ClientError> {
        self.request(|reply| AgentCommand::RoomSignal {
            room_id,
            signal,
            reply,
        })
        .await
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T, ClientError>>) -> AgentCommand,
    ) -> Result<T, ClientError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(build(reply))
            .await
            .map_err(|_| ClientError::AgentStopped)?;
        response.await.map_err(|_| ClientError::AgentStopped)?
    }
}
