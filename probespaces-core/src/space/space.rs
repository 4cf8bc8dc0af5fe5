//! Space aggregate: roster, host relationship, and shared browsing state

use super::state::SharedState;
use super::types::{ConnectionId, ParticipantId, SpaceId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One user's presence within a Space
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub user_id: ParticipantId,
    pub name: String,
    pub color: String,
    pub is_host: bool,
}

/// The participant who created the space, with its underlying connection
#[derive(Debug, Clone)]
pub struct HostInfo {
    pub connection: ConnectionId,
    pub user_id: ParticipantId,
    pub name: String,
    pub color: String,
}

/// A collaborative browsing session
///
/// The roster is keyed by connection and kept in join order; participants
/// arrays on the wire are emitted in that order. Exactly one roster entry has
/// `is_host` set for as long as the space exists: the host never changes,
/// and its departure is a terminal condition handled by the coordinator.
#[derive(Debug, Clone)]
pub struct Space {
    pub id: SpaceId,
    pub host: HostInfo,
    roster: Vec<(ConnectionId, Participant)>,
    pub state: SharedState,
    pub created_at: DateTime<Utc>,
}

impl Space {
    /// Create a new Space with its host as the sole roster entry
    pub fn new(connection: ConnectionId, host_name: String, color: String) -> Self {
        let user_id = ParticipantId::generate();
        let participant = Participant {
            user_id: user_id.clone(),
            name: host_name.clone(),
            color: color.clone(),
            is_host: true,
        };

        Space {
            id: SpaceId::generate(),
            host: HostInfo {
                connection,
                user_id,
                name: host_name,
                color,
            },
            roster: vec![(connection, participant)],
            state: SharedState::default(),
            created_at: Utc::now(),
        }
    }

    /// Add a non-host participant keyed by its connection
    pub fn add_participant(
        &mut self,
        connection: ConnectionId,
        name: String,
        color: String,
    ) -> Participant {
        let participant = Participant {
            user_id: ParticipantId::generate(),
            name,
            color,
            is_host: false,
        };
        self.roster.push((connection, participant.clone()));
        participant
    }

    /// Remove the roster entry for a connection
    ///
    /// Also purges the participant's cursor and selection entries so no
    /// ephemeral state outlives its owner.
    pub fn remove_participant(&mut self, connection: ConnectionId) -> Option<Participant> {
        let pos = self.roster.iter().position(|(c, _)| *c == connection)?;
        let (_, participant) = self.roster.remove(pos);
        self.state.purge_participant(&participant.user_id);
        Some(participant)
    }

    /// Look up the participant bound to a connection
    pub fn participant(&self, connection: ConnectionId) -> Option<&Participant> {
        self.roster
            .iter()
            .find(|(c, _)| *c == connection)
            .map(|(_, p)| p)
    }

    /// Participants in join order
    pub fn participants(&self) -> Vec<Participant> {
        self.roster.iter().map(|(_, p)| p.clone()).collect()
    }

    /// Connections currently in the roster
    pub fn connections(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        self.roster.iter().map(|(c, _)| *c)
    }

    pub fn len(&self) -> usize {
        self.roster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    /// Whether a connection is the host's connection
    pub fn is_host_connection(&self, connection: ConnectionId) -> bool {
        self.host.connection == connection
    }
}
