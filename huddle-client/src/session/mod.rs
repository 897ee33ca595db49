mod candidate_queue;
mod negotiation_state;
mod peer_session;

pub use candidate_queue::CandidateQueue;
pub use negotiation_state::{NegotiationState, Role};
pub use peer_session::{CandidateDisposition, PeerSession, RemoteApplied, Termination};
