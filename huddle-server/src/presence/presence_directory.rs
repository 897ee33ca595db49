use crate::presence::Endpoint;
use dashmap::DashMap;
use huddle_core::{EndpointId, ParticipantId};
use tracing::{debug, info};

/// Maps each participant to the one endpoint it can currently be reached on.
///
/// Every mutation goes through a per-key write lock, so concurrent
/// register/unregister/lookup calls from different connections never race.
#[derive(Debug, Default)]
pub struct PresenceDirectory {
    entries: DashMap<ParticipantId, Endpoint>,
}

impl PresenceDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last write wins. Returns the endpoint id this registration displaced,
    /// if the participant was reachable somewhere else.
    pub fn register(&self, participant_id: ParticipantId, endpoint: Endpoint) -> Option<EndpointId> {
        let endpoint_id = endpoint.id();
        let previous = self
            .entries
            .insert(participant_id.clone(), endpoint)
            .map(|old| old.id())
            .filter(|old| *old != endpoint_id);

        match previous {
            Some(old) => info!(
                "Participant {} moved from endpoint {} to {}",
                participant_id, old, endpoint_id
            ),
            None => debug!("Participant {} registered on {}", participant_id, endpoint_id),
        }

        previous
    }

    pub fn lookup(&self, participant_id: &ParticipantId) -> Option<Endpoint> {
        self.entries.get(participant_id).map(|e| e.value().clone())
    }

    /// Removes every participant still mapped to `endpoint_id` and returns them.
    ///
    /// A participant that already re-registered on a newer endpoint is left alone.
    pub fn unregister(&self, endpoint_id: EndpointId) -> Vec<ParticipantId> {
        let mut removed = Vec::new();

        for participant_id in self.participants_on(endpoint_id) {
            if let Some((id, _)) = self
                .entries
                .remove_if(&participant_id, |_, endpoint| endpoint.id() == endpoint_id)
            {
                removed.push(id);
            }
        }

        if !removed.is_empty() {
            info!("Endpoint {} unregistered: {:?}", endpoint_id, removed);
        }
        removed
    }

    pub fn participants_on(&self, endpoint_id: EndpointId) -> Vec<ParticipantId> {
        self.entries
            .iter()
            .filter(|entry| entry.value().id() == endpoint_id)
            .map(|entry| entry.key().clone())
            .collect()
    }

    pub fn is_registered_on(&self, participant_id: &ParticipantId, endpoint_id: EndpointId) -> bool {
        self.entries
            .get(participant_id)
            .is_some_and(|endpoint| endpoint.id() == endpoint_id)
    }

    pub fn online(&self) -> Vec<ParticipantId> {
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
