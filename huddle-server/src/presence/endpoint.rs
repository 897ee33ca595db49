use huddle_core::{EndpointId, SignalEnvelope};
use tokio::sync::mpsc;
use tracing::error;

/// Outbound half of one live transport connection.
///
/// The WebSocket task owns the receiving side and serializes whatever lands
/// in it; everything else only ever sees this handle.
#[derive(Debug, Clone)]
pub struct Endpoint {
    id: EndpointId,
    outbox: mpsc::UnboundedSender<SignalEnvelope>,
}

impl Endpoint {
    pub fn new(id: EndpointId, outbox: mpsc::UnboundedSender<SignalEnvelope>) -> Self {
        Self { id, outbox }
    }

    /// Fresh endpoint plus the receiver its transport drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SignalEnvelope>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(EndpointId::new(), tx), rx)
    }

    pub fn id(&self) -> EndpointId {
        self.id
    }

    /// Queues an envelope for the transport. Returns `false` when the
    /// connection is already gone.
    pub fn deliver(&self, envelope: SignalEnvelope) -> bool {
        match self.outbox.send(envelope) {
            Ok(()) => true,
            Err(e) => {
                error!(
                    "Failed to queue {} for endpoint {}: connection closed",
                    e.0.kind(),
                    self.id
                );
                false
            }
        }
    }
}

impl PartialEq for Endpoint {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Endpoint {}
