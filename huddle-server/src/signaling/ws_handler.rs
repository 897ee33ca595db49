use crate::SignalingRelay;
use crate::presence::Endpoint;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use huddle_core::{ParticipantId, SignalingError};
use tracing::{debug, error, info, warn};

/// `GET /ws`: the client announces itself with a `join` envelope.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(relay): State<SignalingRelay>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, None, relay))
}

/// `GET /ws/{participant_id}`: joins on upgrade.
pub async fn ws_join_handler(
    ws: WebSocketUpgrade,
    Path(participant_id): Path<String>,
    State(relay): State<SignalingRelay>,
) -> impl IntoResponse {
    let participant_id = ParticipantId::from(participant_id);

    ws.on_upgrade(move |socket| handle_socket(socket, Some(participant_id), relay))
}

async fn handle_socket(
    socket: WebSocket,
    participant_id: Option<ParticipantId>,
    relay: SignalingRelay,
) {
    let (mut sender, mut receiver) = socket.split();
    let (endpoint, mut rx) = Endpoint::channel();
    let endpoint_id = endpoint.id();

    info!("New WebSocket connection: {}", endpoint_id);

    match participant_id {
        Some(id) if id.is_blank() => warn!("Ignoring blank participant id on {}", endpoint_id),
        Some(id) => {
            relay.register(&endpoint, id);
        }
        None => {}
    }

    let mut send_task = tokio::spawn(async move {
        while let Some(envelope) = rx.recv().await {
            let json = match serde_json::to_string(&envelope) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize {}: {}", envelope.kind(), e);
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    // Envelopes from one connection are handled strictly in receipt order.
    let mut recv_task = tokio::spawn({
        let relay = relay.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match relay.handle_text(&endpoint, text.as_str()) {
                        Ok(delivered) => debug!("Delivered {} envelope(s)", delivered),
                        Err(SignalingError::UnknownDestination(to)) => {
                            debug!("Destination {} offline, sender notified", to)
                        }
                        Err(e) => warn!("Dropped envelope from {}: {}", endpoint.id(), e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    let gone = relay.disconnect(endpoint_id);
    info!("WebSocket disconnected: {} ({:?} offline)", endpoint_id, gone);
}
