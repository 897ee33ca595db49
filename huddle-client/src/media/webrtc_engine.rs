use crate::error::MediaError;
use crate::media::{MediaEngine, MediaEvent};
use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use huddle_core::{IceCandidate, IceServerConfig, ParticipantId, SdpKind, SessionDescription};
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8, MediaEngine as RtcMediaEngine};
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

const STREAM_ID: &str = "huddle";

/// `MediaEngine` backed by the `webrtc` crate, one `RTCPeerConnection` per peer.
///
/// Local media is represented by static sample tracks; feeding them with
/// captured frames is left to the embedding application.
pub struct WebRtcEngine {
    ice_servers: RwLock<Vec<RTCIceServer>>,
    peers: DashMap<ParticipantId, Arc<RTCPeerConnection>>,
    with_tracks: DashSet<ParticipantId>,
    local_tracks: RwLock<Vec<Arc<TrackLocalStaticSample>>>,
    events: mpsc::UnboundedSender<MediaEvent>,
}

impl WebRtcEngine {
    pub fn new(ice_servers: &[IceServerConfig]) -> (Self, mpsc::UnboundedReceiver<MediaEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let engine = Self {
            ice_servers: RwLock::new(ice_servers.iter().map(to_rtc_ice_server).collect()),
            peers: DashMap::new(),
            with_tracks: DashSet::new(),
            local_tracks: RwLock::new(Vec::new()),
            events,
        };
        (engine, rx)
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    async fn connection_for(
        &self,
        peer: &ParticipantId,
    ) -> Result<Arc<RTCPeerConnection>, MediaError> {
        if let Some(existing) = self.peers.get(peer) {
            return Ok(existing.value().clone());
        }

        let mut m = RtcMediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;
        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: self.ice_servers.read().await.clone(),
            ..Default::default()
        };
        let connection = Arc::new(api.new_peer_connection(rtc_config).await?);

        let state_tx = self.events.clone();
        let state_peer = peer.clone();
        connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();
                let peer = state_peer.clone();

                Box::pin(async move {
                    info!("Peer connection to {} is {:?}", peer, s);
                    if let Some(event) = state_event(peer, s) {
                        let _ = tx.send(event);
                    }
                })
            },
        ));

        let ice_tx = self.events.clone();
        let ice_peer = peer.clone();
        connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            let peer = ice_peer.clone();

            Box::pin(async move {
                let Some(candidate) = c else { return };
                let init = match candidate.to_json() {
                    Ok(init) => init,
                    Err(e) => {
                        warn!("Failed to serialize local candidate for {}: {}", peer, e);
                        return;
                    }
                };
                let candidate = IceCandidate {
                    candidate: init.candidate,
                    sdp_mid: init.sdp_mid,
                    sdp_m_line_index: init.sdp_mline_index,
                };
                let _ = tx.send(MediaEvent::LocalCandidate { peer, candidate });
            })
        }));

        self.peers.insert(peer.clone(), connection.clone());
        debug!("Created peer connection for {}", peer);
        Ok(connection)
    }

    /// Adds the local tracks to a connection once; media may be acquired
    /// after the connection was opened by a remote offer.
    async fn attach_tracks(
        &self,
        peer: &ParticipantId,
        connection: &RTCPeerConnection,
    ) -> Result<(), MediaError> {
        if self.with_tracks.contains(peer) {
            return Ok(());
        }
        let tracks = self.local_tracks.read().await;
        if tracks.is_empty() {
            return Ok(());
        }
        for track in tracks.iter() {
            let track: Arc<dyn TrackLocal + Send + Sync> = track.clone();
            connection.add_track(track).await?;
        }
        self.with_tracks.insert(peer.clone());
        Ok(())
    }

    fn existing(&self, peer: &ParticipantId) -> Result<Arc<RTCPeerConnection>, MediaError> {
        self.peers
            .get(peer)
            .map(|c| c.value().clone())
            .ok_or_else(|| MediaError::NoPeerConnection(peer.clone()))
    }
}

#[async_trait]
impl MediaEngine for WebRtcEngine {
    async fn acquire_local_media(&self, is_video: bool) -> Result<(), MediaError> {
        let mut tracks = self.local_tracks.write().await;
        if !tracks.is_empty() {
            return Ok(());
        }

        tracks.push(Arc::new(TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: MIME_TYPE_OPUS.to_owned(),
                clock_rate: 48000,
                channels: 2,
                ..Default::default()
            },
            "audio".to_owned(),
            STREAM_ID.to_owned(),
        )));
        if is_video {
            tracks.push(Arc::new(TrackLocalStaticSample::new(
                RTCRtpCodecCapability {
                    mime_type: MIME_TYPE_VP8.to_owned(),
                    clock_rate: 90000,
                    ..Default::default()
                },
                "video".to_owned(),
                STREAM_ID.to_owned(),
            )));
        }

        info!("Local media acquired (video: {})", is_video);
        Ok(())
    }

    async fn release_local_media(&self) {
        let mut tracks = self.local_tracks.write().await;
        if !tracks.is_empty() {
            tracks.clear();
            self.with_tracks.clear();
            info!("Local media released");
        }
    }

    async fn create_offer(
        &self,
        peer: &ParticipantId,
        is_video: bool,
    ) -> Result<SessionDescription, MediaError> {
        let connection = self.connection_for(peer).await?;
        self.attach_tracks(peer, &connection).await?;

        let offer = connection.create_offer(None).await?;
        connection.set_local_description(offer.clone()).await?;
        Ok(SessionDescription::offer(offer.sdp).with_video(is_video))
    }

    async fn create_answer(&self, peer: &ParticipantId) -> Result<SessionDescription, MediaError> {
        let connection = self.existing(peer)?;
        self.attach_tracks(peer, &connection).await?;

        let answer = connection.create_answer(None).await?;
        connection.set_local_description(answer.clone()).await?;
        Ok(SessionDescription::answer(answer.sdp))
    }

    async fn set_remote_description(
        &self,
        peer: &ParticipantId,
        description: &SessionDescription,
    ) -> Result<(), MediaError> {
        let remote = match description.kind {
            SdpKind::Offer => RTCSessionDescription::offer(description.sdp.clone())?,
            SdpKind::Answer => RTCSessionDescription::answer(description.sdp.clone())?,
        };
        let connection = match description.kind {
            SdpKind::Offer => self.connection_for(peer).await?,
            SdpKind::Answer => self.existing(peer)?,
        };
        connection.set_remote_description(remote).await?;
        Ok(())
    }

    async fn add_candidate(
        &self,
        peer: &ParticipantId,
        candidate: &IceCandidate,
    ) -> Result<(), MediaError> {
        let connection = self.existing(peer)?;
        connection
            .add_ice_candidate(RTCIceCandidateInit {
                candidate: candidate.candidate.clone(),
                sdp_mid: candidate.sdp_mid.clone(),
                sdp_mline_index: candidate.sdp_m_line_index,
                ..Default::default()
            })
            .await?;
        Ok(())
    }

    async fn close_peer(&self, peer: &ParticipantId) {
        self.with_tracks.remove(peer);
        if let Some((_, connection)) = self.peers.remove(peer) {
            if let Err(e) = connection.close().await {
                warn!("Failed to close peer connection to {}: {}", peer, e);
            }
            debug!("Closed peer connection for {}", peer);
        }
    }

    async fn configure_ice_servers(&self, servers: &[IceServerConfig]) {
        *self.ice_servers.write().await = servers.iter().map(to_rtc_ice_server).collect();
    }
}

/// `Disconnected` may recover on its own, so only `Failed` ends the call.
fn state_event(peer: ParticipantId, state: RTCPeerConnectionState) -> Option<MediaEvent> {
    match state {
        RTCPeerConnectionState::Connected => Some(MediaEvent::Connected { peer }),
        RTCPeerConnectionState::Failed => Some(MediaEvent::Failed { peer }),
        _ => None,
    }
}

fn to_rtc_ice_server(server: &IceServerConfig) -> RTCIceServer {
    RTCIceServer {
        urls: server.urls.clone(),
        username: server.username.clone().unwrap_or_default(),
        credential: server.credential.clone().unwrap_or_default(),
        ..Default::default()
    }
}
