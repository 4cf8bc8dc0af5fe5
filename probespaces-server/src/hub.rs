//! Connection hub: per-connection outbound queues and space delivery groups

use probespaces_core::broadcast::Broadcaster;
use probespaces_core::protocol::ServerEvent;
use probespaces_core::space::types::{ConnectionId, SpaceId};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing::warn;

/// Outbound frame queue for one connection
pub type OutboundSender = mpsc::UnboundedSender<String>;

/// Tracks live connections and space membership for fan-out
///
/// Sends are fire-and-forget: frames are queued on the connection's writer
/// task and a closed receiver is simply skipped; the reader side tears the
/// connection down through the coordinator when it notices.
#[derive(Default)]
pub struct ConnectionHub {
    inner: Mutex<HubInner>,
}

#[derive(Default)]
struct HubInner {
    connections: HashMap<ConnectionId, OutboundSender>,
    groups: HashMap<SpaceId, HashSet<ConnectionId>>,
}

impl ConnectionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection's outbound queue
    pub fn register(&self, connection: ConnectionId, sender: OutboundSender) {
        self.inner
            .lock()
            .unwrap()
            .connections
            .insert(connection, sender);
    }

    /// Remove a connection and any group memberships it still holds
    pub fn unregister(&self, connection: ConnectionId) {
        let mut inner = self.inner.lock().unwrap();
        inner.connections.remove(&connection);
        for members in inner.groups.values_mut() {
            members.remove(&connection);
        }
        inner.groups.retain(|_, members| !members.is_empty());
    }

    /// Serialize and queue an event for a single connection
    pub fn send_to(&self, connection: ConnectionId, event: &ServerEvent) {
        let inner = self.inner.lock().unwrap();
        let Some(sender) = inner.connections.get(&connection) else {
            return;
        };
        match serde_json::to_string(event) {
            Ok(frame) => {
                let _ = sender.send(frame);
            }
            Err(e) => warn!("Failed to encode event for {}: {}", connection, e),
        }
    }

    /// Number of registered connections
    pub fn connection_count(&self) -> usize {
        self.inner.lock().unwrap().connections.len()
    }
}

impl Broadcaster for ConnectionHub {
    fn join_space(&self, space: &SpaceId, connection: ConnectionId) {
        self.inner
            .lock()
            .unwrap()
            .groups
            .entry(space.clone())
            .or_default()
            .insert(connection);
    }

    fn leave_space(&self, space: &SpaceId, connection: ConnectionId) {
        let mut inner = self.inner.lock().unwrap();
        let now_empty = match inner.groups.get_mut(space) {
            Some(members) => {
                members.remove(&connection);
                members.is_empty()
            }
            None => false,
        };
        if now_empty {
            inner.groups.remove(space);
        }
    }

    fn close_space(&self, space: &SpaceId) {
        self.inner.lock().unwrap().groups.remove(space);
    }

    fn broadcast(&self, space: &SpaceId, exclude: Option<ConnectionId>, event: &ServerEvent) {
        let inner = self.inner.lock().unwrap();
        let Some(members) = inner.groups.get(space) else {
            return;
        };
        let frame = match serde_json::to_string(event) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Failed to encode broadcast for space {}: {}", space, e);
                return;
            }
        };
        for member in members {
            if Some(*member) == exclude {
                continue;
            }
            if let Some(sender) = inner.connections.get(member) {
                let _ = sender.send(frame.clone());
            }
        }
    }
}
