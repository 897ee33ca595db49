use crate::room::Room;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use huddle_core::{ParticipantId, RoomId, SignalingError};
use std::sync::Arc;
use tracing::info;

/// Owns the membership of every live room.
///
/// Each operation takes the room's shard write lock for the duration of the
/// mutation, which serializes concurrent joins and leaves on the same room.
/// Rooms are evicted as soon as their membership becomes empty.
#[derive(Debug, Clone, Default)]
pub struct RoomManager {
    rooms: Arc<DashMap<RoomId, Room>>,
}

impl RoomManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(
        &self,
        room_id: RoomId,
        creator: ParticipantId,
        is_video: bool,
    ) -> Result<(), SignalingError> {
        match self.rooms.entry(room_id.clone()) {
            Entry::Occupied(_) => Err(SignalingError::RoomExists(room_id)),
            Entry::Vacant(slot) => {
                info!("Creating new room: {} (creator {})", room_id, creator);
                slot.insert(Room::new(room_id, creator, is_video));
                Ok(())
            }
        }
    }

    pub fn is_member(
        &self,
        room_id: &RoomId,
        participant_id: &ParticipantId,
    ) -> Result<bool, SignalingError> {
        self.rooms
            .get(room_id)
            .map(|room| room.contains(participant_id))
            .ok_or_else(|| SignalingError::UnknownRoom(room_id.clone()))
    }

    /// Adds the participant and returns the members who should hear about it.
    pub fn join(
        &self,
        room_id: &RoomId,
        participant_id: &ParticipantId,
    ) -> Result<Vec<ParticipantId>, SignalingError> {
        let mut room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| SignalingError::UnknownRoom(room_id.clone()))?;

        if room.insert(participant_id.clone()) {
            info!("{} joined room {} ({} members)", participant_id, room_id, room.len());
        }
        Ok(room.others(participant_id))
    }

    /// Removes the participant and returns who is left. Evicts the room when
    /// nobody is.
    pub fn leave(
        &self,
        room_id: &RoomId,
        participant_id: &ParticipantId,
    ) -> Result<Vec<ParticipantId>, SignalingError> {
        let remaining = {
            let mut room = self
                .rooms
                .get_mut(room_id)
                .ok_or_else(|| SignalingError::UnknownRoom(room_id.clone()))?;

            if !room.remove(participant_id) {
                return Err(SignalingError::NotRoomMember {
                    room_id: room_id.clone(),
                    participant: participant_id.clone(),
                });
            }
            info!("{} left room {}", participant_id, room_id);
            room.members()
        };

        if remaining.is_empty() {
            self.evict_if_empty(room_id);
        }
        Ok(remaining)
    }

    /// Removes the participant from every room it belongs to.
    ///
    /// Returns each affected room with the members still in it.
    pub fn leave_all(&self, participant_id: &ParticipantId) -> Vec<(RoomId, Vec<ParticipantId>)> {
        let mut affected = Vec::new();

        for mut room in self.rooms.iter_mut() {
            if room.remove(participant_id) {
                affected.push((room.id.clone(), room.members()));
            }
        }

        for (room_id, remaining) in &affected {
            if remaining.is_empty() {
                self.evict_if_empty(room_id);
            }
        }
        affected
    }

    pub fn members(&self, room_id: &RoomId) -> Result<Vec<ParticipantId>, SignalingError> {
        self.rooms
            .get(room_id)
            .map(|room| room.members())
            .ok_or_else(|| SignalingError::UnknownRoom(room_id.clone()))
    }

    pub fn contains(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    fn evict_if_empty(&self, room_id: &RoomId) {
        if self.rooms.remove_if(room_id, |_, room| room.is_empty()).is_some() {
            info!("Room {} is empty, evicted", room_id);
        }
    }
}
