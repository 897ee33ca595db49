use crate::agent::{CallAgent, CallEvent};
use crate::error::ClientError;
use crate::session::{PeerSession, Role};
use huddle_core::{ParticipantId, RoomId};
use tracing::{debug, info, warn};

impl CallAgent {
    pub(super) async fn on_member_joined(
        &mut self,
        room_id: RoomId,
        participant: ParticipantId,
    ) -> Result<(), ClientError> {
        if participant == self.local_id {
            return Ok(());
        }
        let Some(room) = self.rooms.get_mut(&room_id) else {
            debug!("{} ignoring join of {} to {}", self.local_id, participant, room_id);
            return Ok(());
        };

        if room.member_joined(participant.clone()) {
            info!("{} joined {}", participant, room_id);
            self.emit(CallEvent::ParticipantJoined {
                room_id: room_id.clone(),
                participant,
            });
        }
        self.reconcile(&room_id).await
    }

    pub(super) async fn on_member_left(
        &mut self,
        room_id: RoomId,
        participant: ParticipantId,
    ) -> Result<(), ClientError> {
        let Some(room) = self.rooms.get_mut(&room_id) else {
            debug!("{} ignoring departure of {} from {}", self.local_id, participant, room_id);
            return Ok(());
        };

        room.member_left(&participant);
        info!("{} left {}", participant, room_id);
        self.emit(CallEvent::ParticipantLeft {
            room_id: room_id.clone(),
            participant,
        });
        self.reconcile(&room_id).await
    }

    /// Brings the sessions of a room in line with its membership: offers to
    /// members we are responsible for and closes sessions with departed ones.
    pub(super) async fn reconcile(&mut self, room_id: &RoomId) -> Result<(), ClientError> {
        let Some(room) = self.rooms.get(room_id) else {
            return Ok(());
        };
        let is_video = room.is_video();
        let plan = room.plan(
            self.sessions
                .values()
                .filter(|s| s.room_id() == Some(room_id))
                .map(PeerSession::remote),
        );
        if plan.is_empty() {
            return Ok(());
        }

        for peer in plan.close {
            self.close_session(&peer).await;
        }

        for peer in plan.open {
            if let Err(e) =
                self.open_session(peer.clone(), Role::Initiator, Some(room_id.clone()), is_video)
            {
                warn!("{} cannot open a room session with {}: {}", self.local_id, peer, e);
                continue;
            }
            if let Err(e) = self.start_offer(&peer).await {
                warn!("{} could not offer to {} in {}: {}", self.local_id, peer, room_id, e);
            }
        }
        Ok(())
    }
}
