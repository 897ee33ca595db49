use crate::agent::{CallAgent, CallEvent};
use crate::error::ClientError;
use crate::media::MediaEvent;
use crate::session::PeerSession;
use huddle_core::SignalEnvelope;
use tracing::{debug, info};

impl CallAgent {
    /// Processes one event reported by the media engine.
    pub async fn handle_media_event(&mut self, event: MediaEvent) -> Result<(), ClientError> {
        match event {
            MediaEvent::LocalCandidate { peer, candidate } => {
                if !self.sessions.get(&peer).is_some_and(PeerSession::is_active) {
                    debug!("{} dropping local candidate for closed session {}", self.local_id, peer);
                    return Ok(());
                }
                self.send(SignalEnvelope::Candidate {
                    to: peer,
                    from: Some(self.local_id.clone()),
                    candidate: candidate.to_payload(),
                })
            }

            MediaEvent::Connected { peer } => {
                let Some(session) = self.sessions.get_mut(&peer) else {
                    return Ok(());
                };
                session.mark_connected()?;
                info!("{} connected to {}", self.local_id, peer);
                self.emit(CallEvent::Connected { peer });
                Ok(())
            }

            MediaEvent::Failed { peer } => {
                self.fail_session(&peer, "connection failed".to_owned()).await;
                Ok(())
            }
        }
    }
}
