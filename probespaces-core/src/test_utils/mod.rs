//! Test utilities for Probe Spaces
//!
//! A recording transport double so coordinator behavior can be tested
//! without a live WebSocket layer.

use crate::broadcast::Broadcaster;
use crate::protocol::ServerEvent;
use crate::space::types::{ConnectionId, SpaceId};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// One recorded broadcast, expanded to its concrete recipients
#[derive(Debug, Clone)]
pub struct BroadcastRecord {
    pub space: SpaceId,
    pub exclude: Option<ConnectionId>,
    /// Group members the frame was delivered to (exclusion already applied),
    /// captured at send time
    pub recipients: Vec<ConnectionId>,
    pub event: ServerEvent,
}

/// Broadcaster double that records group membership and every send
#[derive(Debug, Default)]
pub struct RecordingBroadcaster {
    groups: Mutex<HashMap<SpaceId, HashSet<ConnectionId>>>,
    records: Mutex<Vec<BroadcastRecord>>,
}

impl RecordingBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// All broadcasts recorded so far, in send order
    pub fn records(&self) -> Vec<BroadcastRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Broadcasts recorded for one space, in send order
    pub fn records_for(&self, space: &SpaceId) -> Vec<BroadcastRecord> {
        self.records()
            .into_iter()
            .filter(|r| &r.space == space)
            .collect()
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        self.records.lock().unwrap().clear();
    }

    /// Current members of a space's delivery group
    pub fn members(&self, space: &SpaceId) -> HashSet<ConnectionId> {
        self.groups
            .lock()
            .unwrap()
            .get(space)
            .cloned()
            .unwrap_or_default()
    }
}

impl Broadcaster for RecordingBroadcaster {
    fn join_space(&self, space: &SpaceId, connection: ConnectionId) {
        self.groups
            .lock()
            .unwrap()
            .entry(space.clone())
            .or_default()
            .insert(connection);
    }

    fn leave_space(&self, space: &SpaceId, connection: ConnectionId) {
        let mut groups = self.groups.lock().unwrap();
        let now_empty = match groups.get_mut(space) {
            Some(members) => {
                members.remove(&connection);
                members.is_empty()
            }
            None => false,
        };
        if now_empty {
            groups.remove(space);
        }
    }

    fn close_space(&self, space: &SpaceId) {
        self.groups.lock().unwrap().remove(space);
    }

    fn broadcast(&self, space: &SpaceId, exclude: Option<ConnectionId>, event: &ServerEvent) {
        let members = self
            .groups
            .lock()
            .unwrap()
            .get(space)
            .cloned()
            .unwrap_or_default();
        let recipients = members
            .into_iter()
            .filter(|c| Some(*c) != exclude)
            .collect();

        self.records.lock().unwrap().push(BroadcastRecord {
            space: space.clone(),
            exclude,
            recipients,
            event: event.clone(),
        });
    }
}
