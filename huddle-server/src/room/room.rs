use huddle_core::{ParticipantId, RoomId};
use std::collections::HashSet;

/// Membership record for one mesh call.
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub creator: ParticipantId,
    pub is_video: bool,
    members: HashSet<ParticipantId>,
}

impl Room {
    pub fn new(id: RoomId, creator: ParticipantId, is_video: bool) -> Self {
        let members = HashSet::from([creator.clone()]);
        Self {
            id,
            creator,
            is_video,
            members,
        }
    }

    pub fn contains(&self, participant_id: &ParticipantId) -> bool {
        self.members.contains(participant_id)
    }

    /// Returns `false` if the participant was already a member.
    pub fn insert(&mut self, participant_id: ParticipantId) -> bool {
        self.members.insert(participant_id)
    }

    pub fn remove(&mut self, participant_id: &ParticipantId) -> bool {
        self.members.remove(participant_id)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Everyone in the room except `excluded`.
    pub fn others(&self, excluded: &ParticipantId) -> Vec<ParticipantId> {
        self.members
            .iter()
            .filter(|member| *member != excluded)
            .cloned()
            .collect()
    }

    pub fn members(&self) -> Vec<ParticipantId> {
        self.members.iter().cloned().collect()
    }
}
