//! Peer-to-peer event mirroring.
//!
//! Every configured peer gets a persistent forwarder task: it dials the
//! peer's cluster websocket, registers a local peer listener (so only
//! locally-originated events flow out) and feeds inbound peer events back
//! onto the local bus. `internal` events instead trigger a config reload,
//! which is how admin edits propagate across the cluster.

use std::sync::Arc;
use std::time::Duration;

use askgod_domain::{Event, EventInternal, EventType};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, connect_async_tls_with_config, Connector};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

use super::bus::EventBus;
use crate::config::ConfigManager;
use crate::tls;

/// Fixed delay between reconnection attempts.
const RETRY_DELAY: Duration = Duration::from_secs(3);

/// Consecutive failures before a peer is abandoned.
const MAX_ATTEMPTS: u32 = 20;

pub struct ClusterRelay {
    bus: Arc<EventBus>,
    config: Arc<ConfigManager>,
}

impl ClusterRelay {
    pub fn new(bus: Arc<EventBus>, config: Arc<ConfigManager>) -> Arc<Self> {
        Arc::new(Self { bus, config })
    }

    /// Start one forwarder task per configured peer.
    pub fn spawn_forwarders(self: &Arc<Self>) {
        for peer in &self.config.current().daemon.cluster_peers {
            let relay = self.clone();
            let peer = peer.clone();
            tokio::spawn(async move {
                relay.forward_events(peer).await;
            });
        }
    }

    async fn forward_events(self: Arc<Self>, peer: String) {
        let mut attempts = 0;

        while attempts < MAX_ATTEMPTS {
            debug!(peer = %peer, "Connecting to cluster peer");

            match self.connect(&peer).await {
                Err(err) => {
                    warn!(peer = %peer, error = %err, "Failed to connect to cluster peer");
                }
                Ok(ws) => {
                    info!(peer = %peer, "Connected to cluster peer");
                    attempts = 0;

                    self.run_connection(ws).await;
                    warn!(peer = %peer, "Lost connection with cluster peer");
                }
            }

            attempts += 1;
            tokio::time::sleep(RETRY_DELAY).await;
        }

        error!(peer = %peer, "Giving up on cluster peer");
    }

    /// Pump events both ways until either direction fails.
    async fn run_connection(&self, ws: WebSocketStream<MaybeTlsStream<TcpStream>>) {
        let (mut write, mut read) = ws.split();

        let mut handle = self.bus.register(-1, true, EventType::PEER.to_vec());

        loop {
            tokio::select! {
                outbound = handle.outbound.recv() => {
                    match outbound {
                        Some(body) => {
                            if write.send(Message::Text(body)).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    }
                }
                inbound = read.next() => {
                    match inbound {
                        Some(Ok(Message::Text(text))) => {
                            handle_peer_event(&self.bus, &self.config, &text).await;
                        }
                        Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                        Some(Ok(_)) => {}
                    }
                }
            }
        }

        self.bus.unregister(handle.id);
    }

    async fn connect(
        &self,
        peer: &str,
    ) -> Result<WebSocketStream<MaybeTlsStream<TcpStream>>, String> {
        let config = self.config.current();

        let (url, secure) = if let Some(host) = peer.strip_prefix("https://") {
            (format!("wss://{}/1.0/events?type=cluster", host), true)
        } else {
            let host = peer.strip_prefix("http://").unwrap_or(peer);
            (format!("ws://{}/1.0/events?type=cluster", host), false)
        };

        if secure && !config.daemon.https_certificate.is_empty() {
            let tls_config = tls::cluster_client_config(&config.daemon.https_certificate)
                .map_err(|e| e.to_string())?;

            let (ws, _) = connect_async_tls_with_config(
                url.as_str(),
                None,
                false,
                Some(Connector::Rustls(tls_config)),
            )
            .await
            .map_err(|e| e.to_string())?;

            Ok(ws)
        } else {
            let (ws, _) = connect_async(url.as_str()).await.map_err(|e| e.to_string())?;
            Ok(ws)
        }
    }
}

/// Process one frame received from a peer, either over an outbound relay
/// connection or on the serving side of `/1.0/events?type=cluster`.
pub async fn handle_peer_event(bus: &EventBus, config: &ConfigManager, text: &str) {
    let event: Event = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(err) => {
            error!(error = %err, "Received a broken event from peer");
            return;
        }
    };

    if event.event_type == EventType::Internal {
        let internal: Option<EventInternal> = serde_json::from_value(event.metadata.clone()).ok();
        debug!(kind = ?internal.map(|i| i.kind), "Internal event from peer");

        match config.reload_from_store().await {
            Ok(current) => bus.set_hidden_teams(current.hidden_team_ids()),
            Err(err) => error!(error = %err, "Failed to get new configuration"),
        }

        return;
    }

    bus.publish_raw(&event);
}
