use crate::error::MediaError;
use async_trait::async_trait;
use huddle_core::{IceCandidate, IceServerConfig, ParticipantId, SessionDescription};

/// The media stack a call agent drives.
///
/// Implementations keep one peer connection per remote participant and report
/// gathered candidates and connection changes as `MediaEvent`s.
#[async_trait]
pub trait MediaEngine: Send + Sync {
    /// Opens the local microphone, plus the camera when `is_video`.
    async fn acquire_local_media(&self, is_video: bool) -> Result<(), MediaError>;

    async fn release_local_media(&self);

    /// Creates the offer for `peer` and installs it as the local description.
    async fn create_offer(
        &self,
        peer: &ParticipantId,
        is_video: bool,
    ) -> Result<SessionDescription, MediaError>;

    /// Creates the answer for `peer` and installs it as the local description.
    /// The remote offer must already be set.
    async fn create_answer(&self, peer: &ParticipantId) -> Result<SessionDescription, MediaError>;

    async fn set_remote_description(
        &self,
        peer: &ParticipantId,
        description: &SessionDescription,
    ) -> Result<(), MediaError>;

    async fn add_candidate(
        &self,
        peer: &ParticipantId,
        candidate: &IceCandidate,
    ) -> Result<(), MediaError>;

    async fn close_peer(&self, peer: &ParticipantId);

    /// Applies relay-provided STUN/TURN servers to connections opened later.
    async fn configure_ice_servers(&self, _servers: &[IceServerConfig]) {}
}
