use crate::agent::{AgentCommand, AgentConfig, AgentHandle, CallEvent, MeshRoom};
use crate::error::ClientError;
use crate::media::{MediaEngine, MediaEvent};
use crate::session::PeerSession;
use huddle_core::{ParticipantId, RoomId, SignalEnvelope};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

mod commands_impl;
mod handle_signal_impl;
mod media_event_impl;
mod mesh_impl;
mod negotiation_impl;

const COMMAND_BUFFER: usize = 64;

#[derive(Debug, Clone)]
struct PendingInvite {
    from: ParticipantId,
    is_video: bool,
}

/// One participant's call logic: turns user actions and relay envelopes into
/// session transitions and media-engine calls.
///
/// Every input goes through `&mut self`, so for any one peer nothing is
/// processed concurrently. Drive it directly or `spawn` it as an actor.
pub struct CallAgent {
    local_id: ParticipantId,

    config: AgentConfig,

    engine: Arc<dyn MediaEngine>,

    /// Envelopes for the relay.
    outbox: mpsc::UnboundedSender<SignalEnvelope>,

    /// Notifications for the application.
    events: mpsc::UnboundedSender<CallEvent>,

    /// At most one session per remote participant; ended sessions are removed.
    sessions: HashMap<ParticipantId, PeerSession>,

    /// Callers whose incoming call has not been accepted or rejected yet.
    ringing: HashSet<ParticipantId>,

    /// Callers we accepted; their offer may be answered.
    accepted: HashSet<ParticipantId>,

    rooms: HashMap<RoomId, MeshRoom>,

    invites: HashMap<RoomId, PendingInvite>,

    media_acquired: bool,
}

impl CallAgent {
    pub fn new(
        local_id: ParticipantId,
        config: AgentConfig,
        engine: Arc<dyn MediaEngine>,
        outbox: mpsc::UnboundedSender<SignalEnvelope>,
    ) -> (Self, mpsc::UnboundedReceiver<CallEvent>) {
        let (events, events_rx) = mpsc::unbounded_channel();
        let agent = Self {
            local_id,
            config,
            engine,
            outbox,
            events,
            sessions: HashMap::new(),
            ringing: HashSet::new(),
            accepted: HashSet::new(),
            rooms: HashMap::new(),
            invites: HashMap::new(),
            media_acquired: false,
        };
        (agent, events_rx)
    }

    pub fn local_id(&self) -> &ParticipantId {
        &self.local_id
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn session(&self, peer: &ParticipantId) -> Option<&PeerSession> {
        self.sessions.get(peer)
    }

    pub fn sessions(&self) -> impl Iterator<Item = &PeerSession> {
        self.sessions.values()
    }

    pub fn room(&self, room_id: &RoomId) -> Option<&MeshRoom> {
        self.rooms.get(room_id)
    }

    pub fn is_ringing(&self, from: &ParticipantId) -> bool {
        self.ringing.contains(from)
    }

    pub fn has_invite(&self, room_id: &RoomId) -> bool {
        self.invites.contains_key(room_id)
    }

    pub fn media_acquired(&self) -> bool {
        self.media_acquired
    }

    /// Moves the agent onto its own task.
    pub fn spawn(
        self,
        inbound: mpsc::UnboundedReceiver<SignalEnvelope>,
        media_events: mpsc::UnboundedReceiver<MediaEvent>,
    ) -> (AgentHandle, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let task = tokio::spawn(self.run(command_rx, inbound, media_events));
        (AgentHandle::new(command_tx), task)
    }

    /// Event loop. Stops when every handle is dropped or the relay connection
    /// closes, ending whatever sessions are still open.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<AgentCommand>,
        mut inbound: mpsc::UnboundedReceiver<SignalEnvelope>,
        mut media_events: mpsc::UnboundedReceiver<MediaEvent>,
    ) {
        info!("Call agent for {} started", self.local_id);

        loop {
            tokio::select! {
                cmd = commands.recv() => {
                    match cmd {
                        Some(c) => self.handle_command(c).await,
                        None => {
                            info!("Command channel closed. Stopping agent for {}", self.local_id);
                            break;
                        }
                    }
                }

                envelope = inbound.recv() => {
                    match envelope {
                        Some(e) => {
                            let kind = e.kind();
                            if let Err(err) = self.handle(e).await {
                                warn!("{} failed to handle {}: {}", self.local_id, kind, err);
                            }
                        }
                        None => {
                            warn!("Signaling channel closed for {}", self.local_id);
                            break;
                        }
                    }
                }

                Some(event) = media_events.recv() => {
                    if let Err(err) = self.handle_media_event(event).await {
                        warn!("{} failed to handle media event: {}", self.local_id, err);
                    }
                }
            }
        }

        self.shutdown().await;
        info!("Call agent for {} finished", self.local_id);
    }

    /// Ends every open session and tells the peers.
    pub async fn shutdown(&mut self) {
        let peers: Vec<ParticipantId> = self.sessions.keys().cloned().collect();
        for peer in peers {
            let _ = self.send(SignalEnvelope::End {
                to: peer.clone(),
                from: self.local_id.clone(),
            });
            self.close_session(&peer).await;
        }
    }

    async fn handle_command(&mut self, cmd: AgentCommand) {
        match cmd {
            AgentCommand::Call {
                to,
                is_video,
                room_id,
                reply,
            } => {
                let _ = reply.send(self.call(to, is_video, room_id).await);
            }
            AgentCommand::Accept { from, reply } => {
                let _ = reply.send(self.accept(from).await);
            }
            AgentCommand::Reject { from, reply } => {
                let _ = reply.send(self.reject(from).await);
            }
            AgentCommand::HangUp { peer, reply } => {
                let _ = reply.send(self.hang_up(peer).await);
            }
            AgentCommand::CreateRoom {
                target,
                is_video,
                reply,
            } => {
                let _ = reply.send(self.create_room(target, is_video));
            }
            AgentCommand::Invite {
                room_id,
                target,
                reply,
            } => {
                let _ = reply.send(self.invite(&room_id, target));
            }
            AgentCommand::AcceptInvite { room_id, reply } => {
                let _ = reply.send(self.accept_invite(room_id));
            }
            AgentCommand::JoinRoom {
                room_id,
                is_video,
                reply,
            } => {
                let _ = reply.send(self.join_room(room_id, is_video));
            }
            AgentCommand::LeaveRoom { room_id, reply } => {
                let _ = reply.send(self.leave_room(&room_id).await);
            }
            AgentCommand::RoomSignal {
                room_id,
                signal,
                reply,
            } => {
                let _ = reply.send(self.send_room_signal(&room_id, signal));
            }
        }
    }

    fn send(&self, envelope: SignalEnvelope) -> Result<(), ClientError> {
        trace!("{} sending {}", self.local_id, envelope.kind());
        self.outbox
            .send(envelope)
            .map_err(|_| ClientError::ChannelClosed)
    }

    fn emit(&self, event: CallEvent) {
        if self.events.send(event).is_err() {
            debug!("No listener for call events of {}", self.local_id);
        }
    }
}
