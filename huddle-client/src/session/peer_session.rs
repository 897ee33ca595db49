use crate::error::SessionError;
use crate::session::{CandidateQueue, NegotiationState, Role};
use huddle_core::{
    IceCandidate, ParticipantId, RoomId, SdpKind, SessionDescription, SignalEnvelope,
};
use serde_json::Value;
use tracing::{debug, warn};

/// A remote description that was accepted, plus the candidates it unblocked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteApplied {
    pub description: SessionDescription,
    /// Previously queued candidates, in arrival order. They must reach the
    /// media layer after `description` and before any later candidate.
    pub flushed: Vec<IceCandidate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateDisposition {
    /// Hand these to the media layer now, in order.
    Apply(Vec<IceCandidate>),
    /// Held until a remote description is applied.
    Queued,
}

/// Outcome of `end`/`reject`. Repeating a terminal operation is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Ended,
    AlreadyEnded,
}

/// Negotiation with exactly one remote participant.
///
/// All transitions are synchronous and take `&mut self`; the media work that
/// produces or consumes descriptions happens outside, in the agent.
#[derive(Debug)]
pub struct PeerSession {
    local: ParticipantId,
    remote: ParticipantId,
    room_id: Option<RoomId>,
    role: Role,
    is_video: bool,
    state: NegotiationState,
    local_description: Option<SessionDescription>,
    remote_description: Option<SessionDescription>,
    candidates: CandidateQueue,
}

impl PeerSession {
    pub fn new(local: ParticipantId, remote: ParticipantId, role: Role) -> Self {
        Self {
            local,
            remote,
            room_id: None,
            role,
            is_video: false,
            state: NegotiationState::Idle,
            local_description: None,
            remote_description: None,
            candidates: CandidateQueue::new(),
        }
    }

    pub fn in_room(mut self, room_id: Option<RoomId>) -> Self {
        self.room_id = room_id;
        self
    }

    pub fn with_video(mut self, is_video: bool) -> Self {
        self.is_video = is_video;
        self
    }

    pub fn local(&self) -> &ParticipantId {
        &self.local
    }

    pub fn remote(&self) -> &ParticipantId {
        &self.remote
    }

    pub fn room_id(&self) -> Option<&RoomId> {
        self.room_id.as_ref()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_video(&self) -> bool {
        self.is_video
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        !self.state.is_ended()
    }

    pub fn local_description(&self) -> Option<&SessionDescription> {
        self.local_description.as_ref()
    }

    pub fn remote_description(&self) -> Option<&SessionDescription> {
        self.remote_description.as_ref()
    }

    pub fn pending_candidates(&self) -> usize {
        self.candidates.len()
    }

    /// Attaches a room to a session that was opened before its room was known,
    /// e.g. by a candidate that overtook the offer.
    pub fn adopt_room(&mut self, room_id: RoomId) {
        if self.room_id.is_none() {
            self.room_id = Some(room_id);
        }
    }

    /// Records the local offer and returns the envelope to send.
    pub fn create_offer(
        &mut self,
        description: SessionDescription,
    ) -> Result<SignalEnvelope, SessionError> {
        self.require(NegotiationState::Idle, "create offer")?;
        let description = Self::checked_local(description, SdpKind::Offer)?;

        let envelope = SignalEnvelope::Offer {
            to: self.remote.clone(),
            from: self.local.clone(),
            description: description.to_payload(),
            room_id: self.room_id.clone(),
        };

        self.role = Role::Initiator;
        self.local_description = Some(description);
        self.state = NegotiationState::Offering;
        Ok(envelope)
    }

    pub fn apply_remote_offer(&mut self, payload: &Value) -> Result<RemoteApplied, SessionError> {
        self.require(NegotiationState::Idle, "apply remote offer")?;
        let description = SessionDescription::from_payload(payload, SdpKind::Offer)?;

        if let Some(is_video) = description.is_video {
            self.is_video = is_video;
        }
        self.role = Role::Responder;
        self.state = NegotiationState::Answering;
        Ok(self.accept_remote(description))
    }

    /// Records the local answer and returns the envelope to send.
    pub fn create_answer(
        &mut self,
        description: SessionDescription,
    ) -> Result<SignalEnvelope, SessionError> {
        self.require(NegotiationState::Answering, "create answer")?;
        let description = Self::checked_local(description, SdpKind::Answer)?;

        let envelope = SignalEnvelope::Answer {
            to: self.remote.clone(),
            from: self.local.clone(),
            description: description.to_payload(),
            room_id: self.room_id.clone(),
        };

        self.local_description = Some(description);
        self.state = NegotiationState::DescriptionExchanged;
        Ok(envelope)
    }

    /// Only legal while an offer is outstanding. Anything else (a duplicate,
    /// an answer after hang-up, an answer nobody asked for) is discarded and
    /// the state stays as it was.
    pub fn apply_remote_answer(&mut self, payload: &Value) -> Result<RemoteApplied, SessionError> {
        if self.state != NegotiationState::Offering {
            warn!(
                "Discarding answer from {} while {}",
                self.remote, self.state
            );
            return Err(SessionError::InvalidTransition {
                operation: "apply remote answer",
                state: self.state,
            });
        }
        let description = SessionDescription::from_payload(payload, SdpKind::Answer)?;

        self.state = NegotiationState::DescriptionExchanged;
        Ok(self.accept_remote(description))
    }

    pub fn enqueue_or_apply_candidate(
        &mut self,
        payload: &Value,
    ) -> Result<CandidateDisposition, SessionError> {
        if self.state.is_ended() {
            return Err(SessionError::InvalidTransition {
                operation: "apply candidate",
                state: self.state,
            });
        }
        let candidate = IceCandidate::from_payload(payload)?;

        if self.state.remote_description_applied() {
            let mut ready = self.candidates.drain_if_ready(self.state);
            ready.push(candidate);
            Ok(CandidateDisposition::Apply(ready))
        } else {
            self.candidates.push(candidate);
            debug!(
                "Queued candidate from {} ({} pending)",
                self.remote,
                self.candidates.len()
            );
            Ok(CandidateDisposition::Queued)
        }
    }

    pub fn mark_connected(&mut self) -> Result<(), SessionError> {
        match self.state {
            NegotiationState::Connected => Ok(()),
            NegotiationState::DescriptionExchanged => {
                self.state = NegotiationState::Connected;
                Ok(())
            }
            state => Err(SessionError::InvalidTransition {
                operation: "mark connected",
                state,
            }),
        }
    }

    pub fn end(&mut self) -> Termination {
        if self.state.is_ended() {
            debug!("Session with {} already ended", self.remote);
            return Termination::AlreadyEnded;
        }

        let dropped = self.candidates.clear();
        if dropped > 0 {
            debug!("Dropped {} queued candidates from {}", dropped, self.remote);
        }
        self.local_description = None;
        self.remote_description = None;
        self.state = NegotiationState::Ended;
        Termination::Ended
    }

    /// Declining an incoming call tears the session down like `end`.
    pub fn reject(&mut self) -> Termination {
        self.end()
    }

    fn require(
        &self,
        expected: NegotiationState,
        operation: &'static str,
    ) -> Result<(), SessionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                operation,
                state: self.state,
            })
        }
    }

    fn accept_remote(&mut self, description: SessionDescription) -> RemoteApplied {
        self.remote_description = Some(description.clone());
        RemoteApplied {
            description,
            flushed: self.candidates.drain_if_ready(self.state),
        }
    }

    fn checked_local(
        description: SessionDescription,
        expected: SdpKind,
    ) -> Result<SessionDescription, SessionError> {
        Ok(SessionDescription::from_payload(
            &description.to_payload(),
            expected,
        )?)
    }
}
