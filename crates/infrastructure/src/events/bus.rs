//! Process-wide event fan-out.
//!
//! Listeners register with the set of event types they want; every published
//! event is serialized once and queued to each listener that passes the
//! visibility filters. Each listener's queue is drained by a single owner
//! task, which both serializes socket writes and preserves publish order.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use askgod_application::ports::EventPublisher;
use askgod_application::SharedConfig;
use askgod_domain::{Event, EventFlag, EventInternal, EventTimeline, EventType};
use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tokio::sync::mpsc;
use uuid::Uuid;

/// A registered listener's receiving end. The owner forwards queued frames
/// to its socket and unregisters when either side goes away.
pub struct ListenerHandle {
    pub id: Uuid,
    pub outbound: mpsc::UnboundedReceiver<String>,
}

struct Listener {
    team_id: i64,
    peer: bool,
    types: Vec<EventType>,
    queue: mpsc::UnboundedSender<String>,
}

pub struct EventBus {
    hostname: String,
    config: SharedConfig,
    hidden_teams: ArcSwap<Vec<i64>>,
    listeners: Mutex<HashMap<Uuid, Listener>>,
}

impl EventBus {
    pub fn new(config: SharedConfig) -> Self {
        let hostname = hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "askgod".to_string());

        Self {
            hostname,
            config,
            hidden_teams: ArcSwap::from_pointee(Vec::new()),
            listeners: Mutex::new(HashMap::new()),
        }
    }

    /// The name stamped into the `server` field of every local event.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn set_hidden_teams(&self, ids: Vec<i64>) {
        self.hidden_teams.store(Arc::new(ids));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, Listener>> {
        self.listeners.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a listener. `team_id` 0 means guest, -1 admin or peer.
    pub fn register(&self, team_id: i64, peer: bool, types: Vec<EventType>) -> ListenerHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();

        self.lock().insert(
            id,
            Listener {
                team_id,
                peer,
                types,
                queue: tx,
            },
        );

        ListenerHandle { id, outbound: rx }
    }

    pub fn unregister(&self, id: Uuid) {
        self.lock().remove(&id);
    }

    pub fn listener_count(&self) -> usize {
        self.lock().len()
    }

    /// Publish a locally-originated event.
    ///
    /// This is fire-and-forget and never logs: the tracing pipeline itself
    /// feeds `logging` events through here, so any logging on this path
    /// would recurse.
    pub fn publish<M: Serialize>(&self, event_type: EventType, metadata: &M) {
        let Ok(metadata) = serde_json::to_value(metadata) else {
            return;
        };

        let event = Event {
            server: self.hostname.clone(),
            event_type,
            timestamp: Utc::now(),
            metadata,
        };

        self.broadcast(&event);
    }

    /// Publish an event received from a peer, keeping its origin marker so
    /// it is never reflected back into the cluster.
    pub fn publish_raw(&self, event: &Event) {
        self.broadcast(event);
    }

    fn broadcast(&self, event: &Event) {
        let Ok(body) = serde_json::to_string(event) else {
            return;
        };

        // Timeline events carry per-team visibility.
        let timeline: Option<EventTimeline> = if event.event_type == EventType::Timeline {
            serde_json::from_value(event.metadata.clone()).ok()
        } else {
            None
        };

        let hide_others = self.config.load().editable.scoring.hide_others;
        let hidden = self.hidden_teams.load();

        // Snapshot under the lock, send outside it.
        let targets: Vec<(Uuid, i64, bool, Vec<EventType>, mpsc::UnboundedSender<String>)> = self
            .lock()
            .iter()
            .map(|(id, l)| (*id, l.team_id, l.peer, l.types.clone(), l.queue.clone()))
            .collect();

        let mut dead = Vec::new();

        for (id, team_id, peer, types, queue) in targets {
            // Peers only relay locally-originated events.
            if event.server != self.hostname && peer {
                continue;
            }

            if !types.contains(&event.event_type) {
                continue;
            }

            if let Some(timeline) = &timeline {
                if timeline.teamid > 0 && team_id != -1 && timeline.teamid != team_id {
                    if hide_others {
                        continue;
                    }

                    if hidden.contains(&timeline.teamid) {
                        continue;
                    }
                }
            }

            if queue.send(body.clone()).is_err() {
                dead.push(id);
            }
        }

        if !dead.is_empty() {
            let mut listeners = self.lock();
            for id in dead {
                listeners.remove(&id);
            }
        }
    }
}

#[async_trait]
impl EventPublisher for EventBus {
    async fn publish_flag(&self, event: EventFlag) {
        self.publish(EventType::Flags, &event);
    }

    async fn publish_timeline(&self, event: EventTimeline) {
        self.publish(EventType::Timeline, &event);
    }

    async fn publish_internal(&self, event: EventInternal) {
        self.publish(EventType::Internal, &event);
    }
}
