use huddle_core::{ParticipantId, RoomId};
use std::collections::{BTreeMap, BTreeSet};

/// Who opens the connection to a given room member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshRole {
    /// The member joined after us; we send the offer.
    Initiate,
    /// The member was there first; it offers to us.
    Await,
}

/// Sessions to open and close so the mesh matches the membership.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MeshPlan {
    pub open: Vec<ParticipantId>,
    pub close: Vec<ParticipantId>,
}

impl MeshPlan {
    pub fn is_empty(&self) -> bool {
        self.open.is_empty() && self.close.is_empty()
    }
}

/// Local view of a multi-party room: every other member gets exactly one
/// session, and whoever was in the room first makes the offer.
#[derive(Debug, Clone)]
pub struct MeshRoom {
    id: RoomId,
    is_video: bool,
    members: BTreeMap<ParticipantId, MeshRole>,
}

impl MeshRoom {
    pub fn new(id: RoomId, is_video: bool) -> Self {
        Self {
            id,
            is_video,
            members: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn is_video(&self) -> bool {
        self.is_video
    }

    /// A `join-room` notice: the newcomer is ours to call.
    /// Returns false if the member was already known.
    pub fn member_joined(&mut self, participant: ParticipantId) -> bool {
        if self.members.contains_key(&participant) {
            return false;
        }
        self.members.insert(participant, MeshRole::Initiate);
        true
    }

    /// An offer from a member we have not heard of: it was there before us.
    pub fn member_offered(&mut self, participant: ParticipantId) {
        self.members.entry(participant).or_insert(MeshRole::Await);
    }

    pub fn member_left(&mut self, participant: &ParticipantId) -> bool {
        self.members.remove(participant).is_some()
    }

    pub fn contains(&self, participant: &ParticipantId) -> bool {
        self.members.contains_key(participant)
    }

    pub fn role_of(&self, participant: &ParticipantId) -> Option<MeshRole> {
        self.members.get(participant).copied()
    }

    pub fn members(&self) -> impl Iterator<Item = &ParticipantId> {
        self.members.keys()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Diffs the membership against the peers we currently hold sessions with.
    pub fn plan<'a>(&self, open_sessions: impl IntoIterator<Item = &'a ParticipantId>) -> MeshPlan {
        let open_sessions: BTreeSet<&ParticipantId> = open_sessions.into_iter().collect();

        let open = self
            .members
            .iter()
            .filter(|(id, role)| **role == MeshRole::Initiate && !open_sessions.contains(id))
            .map(|(id, _)| id.clone())
            .collect();
        let close = open_sessions
            .into_iter()
            .filter(|id| !self.members.contains_key(*id))
            .cloned()
            .collect();

        MeshPlan { open, close }
    }
}
