use crate::session::NegotiationState;
use huddle_core::IceCandidate;
use std::collections::VecDeque;

/// Remote candidates that arrived before a remote description was applied.
///
/// Owned by its session and only touched through `&mut`, so a flush can never
/// interleave with an enqueue.
#[derive(Debug, Default)]
pub struct CandidateQueue {
    pending: VecDeque<IceCandidate>,
}

impl CandidateQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, candidate: IceCandidate) {
        self.pending.push_back(candidate);
    }

    /// Hands back every queued candidate in arrival order once `state` allows
    /// applying them. Returns nothing and keeps the queue otherwise.
    pub fn drain_if_ready(&mut self, state: NegotiationState) -> Vec<IceCandidate> {
        if !state.remote_description_applied() {
            return Vec::new();
        }
        self.pending.drain(..).collect()
    }

    /// Drops everything still queued and returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
