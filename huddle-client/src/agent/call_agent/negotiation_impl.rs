use crate::agent::{CallAgent, CallEvent};
use crate::error::{ClientError, MediaError, SessionError};
use crate::session::{NegotiationState, PeerSession, RemoteApplied, Role};
use huddle_core::{IceCandidate, ParticipantId, RoomId, SignalEnvelope};
use tracing::{debug, info, warn};

impl CallAgent {
    pub(super) fn open_session(
        &mut self,
        peer: ParticipantId,
        role: Role,
        room_id: Option<RoomId>,
        is_video: bool,
    ) -> Result<(), SessionError> {
        if self.sessions.get(&peer).is_some_and(PeerSession::is_active) {
            return Err(SessionError::AlreadyActive(peer));
        }

        debug!("{} opening session with {} as {:?}", self.local_id, peer, role);
        let session = PeerSession::new(self.local_id.clone(), peer.clone(), role)
            .in_room(room_id)
            .with_video(is_video);
        self.sessions.insert(peer, session);
        Ok(())
    }

    async fn ensure_local_media(&mut self, is_video: bool) -> Result<(), MediaError> {
        if !self.media_acquired {
            self.engine.acquire_local_media(is_video).await?;
            self.media_acquired = true;
        }
        Ok(())
    }

    /// Opens local media if needed, produces the offer and sends it.
    /// Any failure tears the session down.
    pub(super) async fn start_offer(&mut self, peer: &ParticipantId) -> Result<(), ClientError> {
        let is_video = self
            .sessions
            .get(peer)
            .map(PeerSession::is_video)
            .ok_or_else(|| ClientError::NoSession(peer.clone()))?;

        let result = self.produce_offer(peer, is_video).await;
        if let Err(e) = &result {
            self.fail_session(peer, e.to_string()).await;
        }
        result
    }

    async fn produce_offer(&mut self, peer: &ParticipantId, is_video: bool) -> Result<(), ClientError> {
        self.ensure_local_media(is_video).await?;
        let description = self.engine.create_offer(peer, is_video).await?;

        let session = self
            .sessions
            .get_mut(peer)
            .ok_or_else(|| ClientError::NoSession(peer.clone()))?;
        let envelope = session.create_offer(description)?;

        info!("{} sending offer to {}", self.local_id, peer);
        self.send(envelope)
    }

    /// Answers once the remote offer is applied and the local user agreed to
    /// talk to this peer, either by accepting the call or by being in the room.
    pub(super) async fn answer_if_ready(&mut self, peer: &ParticipantId) -> Result<(), ClientError> {
        let Some(session) = self.sessions.get(peer) else {
            return Ok(());
        };
        if session.state() != NegotiationState::Answering || !self.may_answer(session) {
            return Ok(());
        }
        let is_video = session.is_video();

        let result = self.produce_answer(peer, is_video).await;
        if let Err(e) = &result {
            self.fail_session(peer, e.to_string()).await;
        }
        result
    }

    fn may_answer(&self, session: &PeerSession) -> bool {
        self.accepted.contains(session.remote())
            || session.room_id().is_some_and(|r| self.rooms.contains_key(r))
    }

    async fn produce_answer(&mut self, peer: &ParticipantId, is_video: bool) -> Result<(), ClientError> {
        self.ensure_local_media(is_video).await?;
        let description = self.engine.create_answer(peer).await?;

        let session = self
            .sessions
            .get_mut(peer)
            .ok_or_else(|| ClientError::NoSession(peer.clone()))?;
        let envelope = session.create_answer(description)?;

        info!("{} sending answer to {}", self.local_id, peer);
        self.send(envelope)?;
        self.emit(CallEvent::NegotiationComplete { peer: peer.clone() });
        Ok(())
    }

    /// Installs an accepted remote description, then the candidates it unblocked.
    pub(super) async fn apply_remote(
        &mut self,
        peer: &ParticipantId,
        applied: RemoteApplied,
    ) -> Result<(), ClientError> {
        if let Err(e) = self
            .engine
            .set_remote_description(peer, &applied.description)
            .await
        {
            self.fail_session(peer, e.to_string()).await;
            return Err(e.into());
        }

        if !applied.flushed.is_empty() {
            debug!(
                "{} flushing {} queued candidates from {}",
                self.local_id,
                applied.flushed.len(),
                peer
            );
        }
        self.apply_candidates(peer, &applied.flushed).await;
        Ok(())
    }

    pub(super) async fn apply_candidates(&self, peer: &ParticipantId, candidates: &[IceCandidate]) {
        for candidate in candidates {
            if let Err(e) = self.engine.add_candidate(peer, candidate).await {
                warn!("Failed to add candidate from {}: {}", peer, e);
            }
        }
    }

    /// Ends and forgets the session with `peer`. Releases local media once no
    /// session needs it.
    pub(super) async fn close_session(&mut self, peer: &ParticipantId) -> Option<PeerSession> {
        self.ringing.remove(peer);
        self.accepted.remove(peer);

        let mut session = self.sessions.remove(peer)?;
        session.end();
        self.engine.close_peer(peer).await;
        info!("{} closed session with {}", self.local_id, peer);

        if self.sessions.is_empty() && self.media_acquired {
            self.engine.release_local_media().await;
            self.media_acquired = false;
        }
        Some(session)
    }

    pub(super) async fn fail_session(&mut self, peer: &ParticipantId, reason: String) {
        warn!("{} negotiation with {} failed: {}", self.local_id, peer, reason);

        if self.close_session(peer).await.is_some() {
            let _ = self.send(SignalEnvelope::End {
                to: peer.clone(),
                from: self.local_id.clone(),
            });
            self.emit(CallEvent::NegotiationFailed {
                peer: peer.clone(),
                reason,
            });
        }
    }
}
