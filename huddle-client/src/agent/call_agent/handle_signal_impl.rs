use crate::agent::call_agent::PendingInvite;
use crate::agent::{CallAgent, CallEvent};
use crate::error::ClientError;
use crate::session::{CandidateDisposition, NegotiationState, Role};
use huddle_core::{ParticipantId, RoomId, SignalEnvelope, SignalingError};
use serde_json::Value;
use tracing::{debug, info, warn};

impl CallAgent {
    /// Processes one envelope delivered by the relay.
    pub async fn handle(&mut self, envelope: SignalEnvelope) -> Result<(), ClientError> {
        match envelope {
            SignalEnvelope::IceConfig { ice_servers } => {
                info!("Received ICE config: {} servers", ice_servers.len());
                self.engine.configure_ice_servers(&ice_servers).await;
                self.emit(CallEvent::IceConfig { ice_servers });
                Ok(())
            }

            SignalEnvelope::IncomingCall {
                from,
                room_id,
                is_video,
                ..
            } => {
                if let Err(e) =
                    self.open_session(from.clone(), Role::Responder, Some(room_id.clone()), is_video)
                {
                    info!("{} declining call from {}: {}", self.local_id, from, e);
                    self.send(SignalEnvelope::Reject {
                        to: from,
                        from: self.local_id.clone(),
                    })?;
                    return Err(e.into());
                }
                info!("{} has an incoming call from {}", self.local_id, from);
                self.ringing.insert(from.clone());
                self.emit(CallEvent::IncomingCall {
                    from,
                    room_id,
                    is_video,
                });
                Ok(())
            }

            SignalEnvelope::Accept { from, .. } => self.on_accept(from).await,

            SignalEnvelope::Reject { from, .. } => {
                if self.close_session(&from).await.is_some() {
                    self.emit(CallEvent::CallRejected { peer: from });
                }
                Ok(())
            }

            SignalEnvelope::End { from, .. } => {
                match self.close_session(&from).await {
                    Some(_) => self.emit(CallEvent::CallEnded { peer: from }),
                    None => debug!("{} ignoring end from {}: no session", self.local_id, from),
                }
                Ok(())
            }

            SignalEnvelope::Offer {
                from,
                description,
                room_id,
                ..
            } => self.on_offer(from, description, room_id).await,

            SignalEnvelope::Answer {
                from, description, ..
            } => self.on_answer(from, description).await,

            SignalEnvelope::Candidate {
                from, candidate, ..
            } => {
                let from = from.ok_or_else(|| {
                    SignalingError::malformed_payload("candidate", "missing sender")
                })?;
                self.on_candidate(from, candidate).await
            }

            SignalEnvelope::AddParticipant {
                room_id,
                from,
                is_video,
                ..
            } => {
                info!("{} invited to {} by {}", self.local_id, room_id, from);
                self.invites.insert(
                    room_id.clone(),
                    PendingInvite {
                        from: from.clone(),
                        is_video,
                    },
                );
                self.emit(CallEvent::RoomInvite {
                    room_id,
                    from,
                    is_video,
                });
                Ok(())
            }

            SignalEnvelope::JoinRoom {
                room_id, user_id, ..
            } => self.on_member_joined(room_id, user_id).await,

            SignalEnvelope::LeaveRoom { room_id, user_id } => {
                self.on_member_left(room_id, user_id).await
            }

            SignalEnvelope::RoomSignal {
                room_id,
                from,
                signal,
            } => {
                self.emit(CallEvent::RoomSignal {
                    room_id,
                    from,
                    signal,
                });
                Ok(())
            }

            SignalEnvelope::UserOffline { user_id } => {
                info!("{} learned {} is offline", self.local_id, user_id);
                self.close_session(&user_id).await;
                self.emit(CallEvent::PeerOffline { peer: user_id });
                Ok(())
            }

            other @ (SignalEnvelope::Join { .. }
            | SignalEnvelope::CallIntent { .. }
            | SignalEnvelope::CreateRoom { .. }) => {
                warn!("{} ignoring unexpected {} from relay", self.local_id, other.kind());
                Ok(())
            }
        }
    }

    async fn on_accept(&mut self, from: ParticipantId) -> Result<(), ClientError> {
        let Some(session) = self.sessions.get(&from) else {
            debug!("{} ignoring accept from {}: no session", self.local_id, from);
            return Ok(());
        };
        if session.role() != Role::Initiator || self.ringing.contains(&from) {
            warn!(
                "{} discarding accept from {}: not calling it ({:?}, {})",
                self.local_id,
                from,
                session.role(),
                session.state()
            );
            return Ok(());
        }
        let waiting_to_offer = session.state() == NegotiationState::Idle;

        info!("{} call accepted by {}", self.local_id, from);
        self.emit(CallEvent::CallAccepted { peer: from.clone() });
        if waiting_to_offer {
            self.start_offer(&from).await?;
        }
        Ok(())
    }

    async fn on_offer(
        &mut self,
        from: ParticipantId,
        description: Value,
        room_id: Option<RoomId>,
    ) -> Result<(), ClientError> {
        let mesh = room_id.as_ref().and_then(|r| self.rooms.get_mut(r));
        let in_room = mesh.is_some();
        let room_video = mesh.map(|room| {
            room.member_offered(from.clone());
            room.is_video()
        });

        if !self.sessions.contains_key(&from) {
            if !in_room {
                warn!("{} dropping unsolicited offer from {}", self.local_id, from);
                return Ok(());
            }
            self.open_session(
                from.clone(),
                Role::Responder,
                room_id.clone(),
                room_video.unwrap_or(false),
            )?;
        }

        let applied = {
            let session = self
                .sessions
                .get_mut(&from)
                .ok_or_else(|| ClientError::NoSession(from.clone()))?;
            if let Some(room_id) = room_id {
                session.adopt_room(room_id);
            }
            session.apply_remote_offer(&description)?
        };

        info!("{} applied offer from {}", self.local_id, from);
        self.apply_remote(&from, applied).await?;
        self.answer_if_ready(&from).await
    }

    async fn on_answer(&mut self, from: ParticipantId, description: Value) -> Result<(), ClientError> {
        let Some(session) = self.sessions.get_mut(&from) else {
            debug!("{} ignoring answer from {}: no session", self.local_id, from);
            return Ok(());
        };
        let applied = session.apply_remote_answer(&description)?;

        info!("{} applied answer from {}", self.local_id, from);
        self.apply_remote(&from, applied).await?;
        self.emit(CallEvent::NegotiationComplete { peer: from });
        Ok(())
    }

    async fn on_candidate(&mut self, from: ParticipantId, payload: Value) -> Result<(), ClientError> {
        if !self.sessions.contains_key(&from) {
            // Only a known room member's candidate may overtake its offer.
            let Some((room_id, is_video)) = self
                .rooms
                .values()
                .find(|room| room.contains(&from))
                .map(|room| (room.id().clone(), room.is_video()))
            else {
                debug!("{} dropping candidate from {}: no session", self.local_id, from);
                return Ok(());
            };
            self.open_session(from.clone(), Role::Responder, Some(room_id), is_video)?;
        }

        let disposition = self
            .sessions
            .get_mut(&from)
            .ok_or_else(|| ClientError::NoSession(from.clone()))?
            .enqueue_or_apply_candidate(&payload)?;

        if let CandidateDisposition::Apply(ready) = disposition {
            self.apply_candidates(&from, &ready).await;
        }
        Ok(())
    }
}
