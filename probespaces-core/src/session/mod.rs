//! Session bindings between live connections and their space identity

use crate::space::types::{ConnectionId, ParticipantId, SpaceId};
use std::collections::HashMap;

/// The (space, participant) identity attached to a connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionBinding {
    pub space_id: SpaceId,
    pub participant_id: ParticipantId,
}

/// Table mapping connections to their session bindings
///
/// The binding is the only link between a transport connection and the space
/// it participates in; events from a connection with no binding are benign
/// no-ops. A connection holds at most one binding at a time.
#[derive(Debug, Default)]
pub struct SessionTable {
    bindings: HashMap<ConnectionId, SessionBinding>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a connection to a space; replaces any previous binding
    pub fn bind(
        &mut self,
        connection: ConnectionId,
        space_id: SpaceId,
        participant_id: ParticipantId,
    ) {
        self.bindings.insert(
            connection,
            SessionBinding {
                space_id,
                participant_id,
            },
        );
    }

    /// Resolve a connection to its binding, if any
    pub fn resolve(&self, connection: ConnectionId) -> Option<&SessionBinding> {
        self.bindings.get(&connection)
    }

    /// Detach a connection, returning the binding it held
    pub fn unbind(&mut self, connection: ConnectionId) -> Option<SessionBinding> {
        self.bindings.remove(&connection)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
