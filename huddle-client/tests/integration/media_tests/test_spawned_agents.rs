use crate::integration::init_tracing;
use crate::utils::{MockMediaEngine, participant};
use anyhow::{Context, Result};
use huddle_client::{AgentConfig, AgentHandle, CallAgent, CallEvent};
use huddle_server::{Endpoint, SignalingRelay};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Timeout for one expected event (ms).
const EVENT_TIMEOUT_MS: u64 = 2000;

/// Spawns an agent whose outbox is pumped into the relay.
fn spawn_agent(
    relay: &SignalingRelay,
    id: &str,
    config: AgentConfig,
) -> (AgentHandle, mpsc::UnboundedReceiver<CallEvent>) {
    let (engine, media) = MockMediaEngine::new(id);
    let (outbox_tx, mut outbox_rx) = mpsc::unbounded_channel();
    let (agent, events) = CallAgent::new(id.into(), config, Arc::new(engine), outbox_tx);
    let (endpoint, inbound) = Endpoint::channel();

    agent.register().expect("register should queue");
    let relay = relay.clone();
    tokio::spawn(async move {
        while let Some(envelope) = outbox_rx.recv().await {
            let _ = relay.handle(&endpoint, envelope);
        }
    });

    let (handle, _task) = agent.spawn(inbound, media);
    (handle, events)
}

async fn wait_for(
    events: &mut mpsc::UnboundedReceiver<CallEvent>,
    predicate: impl Fn(&CallEvent) -> bool,
) -> Result<CallEvent> {
    tokio::time::timeout(Duration::from_millis(EVENT_TIMEOUT_MS), async {
        while let Some(event) = events.recv().await {
            if predicate(&event) {
                return Some(event);
            }
        }
        None
    })
    .await
    .context("Timeout waiting for call event")?
    .context("Event channel closed")
}

async fn wait_online(relay: &SignalingRelay, ids: &[&str]) -> Result<()> {
    tokio::time::timeout(Duration::from_millis(EVENT_TIMEOUT_MS), async {
        while !ids
            .iter()
            .all(|id| relay.directory().lookup(&participant(id)).is_some())
        {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .context("Timeout waiting for registration")
}

#[tokio::test]
async fn test_spawned_agents_complete_a_call() -> Result<()> {
    init_tracing();
    let relay = SignalingRelay::with_ice_servers(Vec::new());
    let (alice, mut alice_events) = spawn_agent(&relay, "alice", AgentConfig::lazy());
    let (bob, mut bob_events) = spawn_agent(&relay, "bob", AgentConfig::lazy());
    wait_online(&relay, &["alice", "bob"]).await?;

    let room_id = alice.call(participant("bob"), false, None).await?;
    let incoming = wait_for(&mut bob_events, |e| {
        matches!(e, CallEvent::IncomingCall { .. })
    })
    .await?;
    assert_eq!(
        incoming,
        CallEvent::IncomingCall {
            from: participant("alice"),
            room_id,
            is_video: false,
        }
    );

    bob.accept(participant("alice")).await?;
    wait_for(&mut alice_events, |e| {
        *e == CallEvent::NegotiationComplete {
            peer: participant("bob"),
        }
    })
    .await?;
    wait_for(&mut bob_events, |e| {
        *e == CallEvent::NegotiationComplete {
            peer: participant("alice"),
        }
    })
    .await?;

    alice.hang_up(participant("bob")).await?;
    wait_for(&mut bob_events, |e| {
        *e == CallEvent::CallEnded {
            peer: participant("alice"),
        }
    })
    .await?;

    Ok(())
}
