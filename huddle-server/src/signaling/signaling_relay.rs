use crate::config::RelayConfig;
use crate::presence::{Endpoint, PresenceDirectory};
use crate::room::RoomManager;
use huddle_core::{
    EndpointId, IceServerConfig, ParticipantId, Route, SignalEnvelope, SignalingError,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

struct RelayInner {
    directory: PresenceDirectory,
    rooms: RoomManager,
    ice_servers: Vec<IceServerConfig>,
}

/// Courier between transport connections.
///
/// Holds no per-call state: it resolves destinations through the
/// [`PresenceDirectory`] and room membership, then forwards envelopes
/// verbatim. Description, candidate and room-signal payloads are never decoded.
#[derive(Clone)]
pub struct SignalingRelay {
    inner: Arc<RelayInner>,
}

impl SignalingRelay {
    pub fn new(config: &RelayConfig) -> Self {
        Self::with_ice_servers(config.ice_servers.clone())
    }

    pub fn with_ice_servers(ice_servers: Vec<IceServerConfig>) -> Self {
        Self {
            inner: Arc::new(RelayInner {
                directory: PresenceDirectory::new(),
                rooms: RoomManager::new(),
                ice_servers,
            }),
        }
    }

    pub fn directory(&self) -> &PresenceDirectory {
        &self.inner.directory
    }

    pub fn rooms(&self) -> &RoomManager {
        &self.inner.rooms
    }

    /// Parses a text frame and routes it.
    pub fn handle_text(&self, endpoint: &Endpoint, text: &str) -> Result<usize, SignalingError> {
        let envelope = SignalEnvelope::from_json(text)?;
        self.handle(endpoint, envelope)
    }

    /// Single entry point for everything a connection sends.
    ///
    /// Returns how many envelopes were queued for delivery. Errors describe
    /// why an envelope was dropped; none of them should close the connection.
    pub fn handle(
        &self,
        endpoint: &Endpoint,
        envelope: SignalEnvelope,
    ) -> Result<usize, SignalingError> {
        if envelope.route() == Route::RelayOriginated {
            return Err(SignalingError::malformed(format!(
                "{} may only be sent by the relay",
                envelope.kind()
            )));
        }

        if let SignalEnvelope::Join { participant_id } = envelope {
            return Ok(self.register(endpoint, participant_id));
        }

        let envelope = self.authenticate(endpoint, envelope)?;
        debug!("Routing {} from endpoint {}", envelope.kind(), endpoint.id());

        match envelope {
            SignalEnvelope::CallIntent {
                to,
                from,
                is_video,
                room_id,
            } => {
                let incoming = SignalEnvelope::IncomingCall {
                    to: to.clone(),
                    from,
                    is_video,
                    room_id,
                };
                self.forward(endpoint, &to, incoming)
            }

            SignalEnvelope::CreateRoom {
                room_id,
                creator,
                target,
                is_video,
            } => {
                self.inner
                    .rooms
                    .create(room_id.clone(), creator.clone(), is_video)?;
                let invite = SignalEnvelope::AddParticipant {
                    room_id,
                    from: creator,
                    target: target.clone(),
                    is_video,
                };
                self.forward(endpoint, &target, invite)
            }

            SignalEnvelope::AddParticipant {
                ref room_id,
                ref from,
                ref target,
                ..
            } => {
                if !self.inner.rooms.is_member(room_id, from)? {
                    return Err(SignalingError::NotRoomMember {
                        room_id: room_id.clone(),
                        participant: from.clone(),
                    });
                }
                let target = target.clone();
                self.forward(endpoint, &target, envelope)
            }

            SignalEnvelope::JoinRoom {
                ref room_id,
                ref user_id,
                ..
            } => {
                let members = self.inner.rooms.join(room_id, user_id)?;
                Ok(self.broadcast(&members, &envelope))
            }

            SignalEnvelope::LeaveRoom {
                ref room_id,
                ref user_id,
            } => {
                let remaining = self.inner.rooms.leave(room_id, user_id)?;
                Ok(self.broadcast(&remaining, &envelope))
            }

            SignalEnvelope::RoomSignal {
                ref room_id,
                ref from,
                ..
            } => {
                if !self.inner.rooms.is_member(room_id, from)? {
                    return Err(SignalingError::NotRoomMember {
                        room_id: room_id.clone(),
                        participant: from.clone(),
                    });
                }
                let others: Vec<ParticipantId> = self
                    .inner
                    .rooms
                    .members(room_id)?
                    .into_iter()
                    .filter(|member| member != from)
                    .collect();
                Ok(self.broadcast(&others, &envelope))
            }

            other => {
                let to = match other.route() {
                    Route::Direct(to) => to.clone(),
                    _ => {
                        return Err(SignalingError::malformed(format!(
                            "no route for {}",
                            other.kind()
                        )));
                    }
                };
                self.forward(endpoint, &to, other)
            }
        }
    }

    /// Registers a participant on an endpoint and hands it the ICE config.
    pub fn register(&self, endpoint: &Endpoint, participant_id: ParticipantId) -> usize {
        info!("Participant {} joined on {}", participant_id, endpoint.id());
        self.inner.directory.register(participant_id, endpoint.clone());

        if self.inner.ice_servers.is_empty() {
            return 0;
        }
        let config = SignalEnvelope::IceConfig {
            ice_servers: self.inner.ice_servers.clone(),
        };
        usize::from(endpoint.deliver(config))
    }

    /// Tears down a closed connection.
    ///
    /// Every participant still mapped to the endpoint goes offline and is
    /// removed from its rooms; the remaining members get a `leave-room` on its
    /// behalf. Pairwise sessions outside rooms are not tracked here, so their
    /// counterparts learn about it through `user-offline` on their next send.
    pub fn disconnect(&self, endpoint_id: EndpointId) -> Vec<ParticipantId> {
        let gone = self.inner.directory.unregister(endpoint_id);

        for participant_id in &gone {
            for (room_id, remaining) in self.inner.rooms.leave_all(participant_id) {
                let notice = SignalEnvelope::LeaveRoom {
                    room_id,
                    user_id: participant_id.clone(),
                };
                self.broadcast(&remaining, &notice);
            }
        }
        gone
    }

    /// Checks the claimed sender against the connection and fills in a
    /// missing candidate sender.
    fn authenticate(
        &self,
        endpoint: &Endpoint,
        mut envelope: SignalEnvelope,
    ) -> Result<SignalEnvelope, SignalingError> {
        if let SignalEnvelope::Candidate { from, .. } = &mut envelope
            && from.is_none()
        {
            // A shared connection gives no single sender to stamp.
            let mut participants = self.inner.directory.participants_on(endpoint.id());
            let participant_id = match participants.len() {
                0 => return Err(SignalingError::malformed("candidate sent before join")),
                1 => participants.remove(0),
                _ => {
                    return Err(SignalingError::malformed(
                        "candidate without sender on a shared connection",
                    ));
                }
            };
            *from = Some(participant_id);
            return Ok(envelope);
        }

        match envelope.sender() {
            Some(sender) if self.inner.directory.is_registered_on(sender, endpoint.id()) => {
                Ok(envelope)
            }
            Some(sender) => Err(SignalingError::malformed(format!(
                "{} claims sender {} which is not joined on this connection",
                envelope.kind(),
                sender
            ))),
            None => Err(SignalingError::malformed(format!(
                "{} has no sender",
                envelope.kind()
            ))),
        }
    }

    /// Delivers to one participant, or bounces a single `user-offline`
    /// notice back to the sending endpoint.
    fn forward(
        &self,
        sender: &Endpoint,
        to: &ParticipantId,
        envelope: SignalEnvelope,
    ) -> Result<usize, SignalingError> {
        let Some(destination) = self.inner.directory.lookup(to) else {
            info!("Dropping {} for offline participant {}", envelope.kind(), to);
            sender.deliver(SignalEnvelope::UserOffline {
                user_id: to.clone(),
            });
            return Err(SignalingError::UnknownDestination(to.clone()));
        };

        debug!("Forwarding {} to {}", envelope.kind(), to);
        Ok(usize::from(destination.deliver(envelope)))
    }

    fn broadcast(&self, members: &[ParticipantId], envelope: &SignalEnvelope) -> usize {
        let mut delivered = 0;
        for member in members {
            match self.inner.directory.lookup(member) {
                Some(endpoint) => {
                    if endpoint.deliver(envelope.clone()) {
                        delivered += 1;
                    }
                }
                None => debug!("Skipping {} for offline member {}", envelope.kind(), member),
            }
        }

        if delivered < members.len() {
            warn!(
                "{} reached {} of {} room members",
                envelope.kind(),
                delivered,
                members.len()
            );
        }
        delivered
    }
}
