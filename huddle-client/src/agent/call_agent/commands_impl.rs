use crate::agent::{CallAgent, CallSetup, MeshRoom};
use crate::error::ClientError;
use crate::session::{PeerSession, Role};
use huddle_core::{ParticipantId, RoomId, SignalEnvelope};
use serde_json::Value;
use tracing::info;

impl CallAgent {
    /// Announces this participant to the relay.
    pub fn register(&self) -> Result<(), ClientError> {
        self.send(SignalEnvelope::Join {
            participant_id: self.local_id.clone(),
        })
    }

    /// Rings `to`. Returns the room id labelling the call.
    pub async fn call(
        &mut self,
        to: ParticipantId,
        is_video: bool,
        room_id: Option<RoomId>,
    ) -> Result<RoomId, ClientError> {
        let room_id = room_id.unwrap_or_else(RoomId::generate);
        self.open_session(to.clone(), Role::Initiator, Some(room_id.clone()), is_video)?;

        info!("{} calling {} in {}", self.local_id, to, room_id);
        self.send(SignalEnvelope::CallIntent {
            to: to.clone(),
            from: self.local_id.clone(),
            is_video,
            room_id: room_id.clone(),
        })?;

        if self.config.setup == CallSetup::Eager {
            self.start_offer(&to).await?;
        }
        Ok(room_id)
    }

    pub async fn accept(&mut self, from: ParticipantId) -> Result<(), ClientError> {
        if !self.ringing.remove(&from) {
            return Err(ClientError::NoPendingCall(from));
        }

        info!("{} accepted call from {}", self.local_id, from);
        self.accepted.insert(from.clone());
        self.send(SignalEnvelope::Accept {
            to: from.clone(),
            from: self.local_id.clone(),
        })?;
        self.answer_if_ready(&from).await
    }

    pub async fn reject(&mut self, from: ParticipantId) -> Result<(), ClientError> {
        if !self.ringing.contains(&from) {
            return Err(ClientError::NoPendingCall(from));
        }

        info!("{} rejected call from {}", self.local_id, from);
        self.send(SignalEnvelope::Reject {
            to: from.clone(),
            from: self.local_id.clone(),
        })?;
        if let Some(session) = self.sessions.get_mut(&from) {
            session.reject();
        }
        self.close_session(&from).await;
        Ok(())
    }

    pub async fn hang_up(&mut self, peer: ParticipantId) -> Result<(), ClientError> {
        if !self.sessions.contains_key(&peer) {
            return Err(ClientError::NoSession(peer));
        }

        info!("{} hanging up on {}", self.local_id, peer);
        self.send(SignalEnvelope::End {
            to: peer.clone(),
            from: self.local_id.clone(),
        })?;
        self.close_session(&peer).await;
        Ok(())
    }

    /// Creates a room with this participant in it and invites `target`.
    pub fn create_room(&mut self, target: ParticipantId, is_video: bool) -> Result<RoomId, ClientError> {
        let room_id = RoomId::generate();
        self.rooms
            .insert(room_id.clone(), MeshRoom::new(room_id.clone(), is_video));

        info!("{} creating room {} with {}", self.local_id, room_id, target);
        self.send(SignalEnvelope::CreateRoom {
            room_id: room_id.clone(),
            creator: self.local_id.clone(),
            target,
            is_video,
        })?;
        Ok(room_id)
    }

    pub fn invite(&self, room_id: &RoomId, target: ParticipantId) -> Result<(), ClientError> {
        let room = self
            .rooms
            .get(room_id)
            .ok_or_else(|| ClientError::NotInRoom(room_id.clone()))?;

        self.send(SignalEnvelope::AddParticipant {
            room_id: room_id.clone(),
            from: self.local_id.clone(),
            target,
            is_video: room.is_video(),
        })
    }

    pub fn accept_invite(&mut self, room_id: RoomId) -> Result<(), ClientError> {
        let invite = self
            .invites
            .remove(&room_id)
            .ok_or_else(|| ClientError::NoPendingInvite(room_id.clone()))?;

        info!("{} accepted invite from {} to {}", self.local_id, invite.from, room_id);
        self.join_room(room_id, invite.is_video)
    }

    pub fn decline_invite(&mut self, room_id: &RoomId) -> Result<(), ClientError> {
        self.invites
            .remove(room_id)
            .map(|_| ())
            .ok_or_else(|| ClientError::NoPendingInvite(room_id.clone()))
    }

    /// Joins a room. Members already inside will send offers; members joining
    /// later are offered to by us.
    pub fn join_room(&mut self, room_id: RoomId, is_video: bool) -> Result<(), ClientError> {
        self.invites.remove(&room_id);
        self.rooms
            .entry(room_id.clone())
            .or_insert_with(|| MeshRoom::new(room_id.clone(), is_video));

        info!("{} joining room {}", self.local_id, room_id);
        self.send(SignalEnvelope::JoinRoom {
            room_id,
            user_id: self.local_id.clone(),
            is_video: Some(is_video),
        })
    }

    pub async fn leave_room(&mut self, room_id: &RoomId) -> Result<(), ClientError> {
        if self.rooms.remove(room_id).is_none() {
            return Err(ClientError::NotInRoom(room_id.clone()));
        }

        info!("{} leaving room {}", self.local_id, room_id);
        let result = self.send(SignalEnvelope::LeaveRoom {
            room_id: room_id.clone(),
            user_id: self.local_id.clone(),
        });

        let peers: Vec<ParticipantId> = self
            .sessions
            .values()
            .filter(|s| s.room_id() == Some(room_id))
            .map(PeerSession::remote)
            .cloned()
            .collect();
        for peer in peers {
            self.close_session(&peer).await;
        }
        result
    }

    /// Broadcasts an application payload to the other room members.
    pub fn send_room_signal(&self, room_id: &RoomId, signal: Value) -> Result<(), ClientError> {
        if !self.rooms.contains_key(room_id) {
            return Err(ClientError::NotInRoom(room_id.clone()));
        }

        self.send(SignalEnvelope::RoomSignal {
            room_id: room_id.clone(),
            from: self.local_id.clone(),
            signal,
        })
    }
}
