//! Identifier types for spaces, participants, and connections

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a Space
///
/// Eight random bytes, hex encoded, short enough for an invite link. Ids
/// must not collide among live spaces; a collision is a correctness bug, not
/// a handled error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpaceId(pub String);

impl SpaceId {
    /// Create a new random SpaceId
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut id = [0u8; 8];
        rand::rng().fill_bytes(&mut id);
        SpaceId(hex::encode(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SpaceId {
    fn from(id: String) -> Self {
        SpaceId(id)
    }
}

impl From<&str> for SpaceId {
    fn from(id: &str) -> Self {
        SpaceId(id.to_string())
    }
}

/// Unique identifier for a participant within a Space
///
/// Independent of the underlying connection: a participant id appears in
/// rosters, cursor/selection maps, and outbound events.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    /// Create a new random ParticipantId
    pub fn generate() -> Self {
        ParticipantId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of one live transport connection
///
/// Assigned by the transport when the connection is accepted; never leaves
/// the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Create a new random ConnectionId
    pub fn generate() -> Self {
        ConnectionId(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display colors assigned to participants
///
/// Uniform random pick with no uniqueness guarantee; two participants sharing
/// a color is acceptable.
pub const COLOR_PALETTE: [&str; 12] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#FFA07A",
    "#98D8C8", "#F7DC6F", "#BB8FCE", "#85C1E2",
    "#FF8C94", "#74B9FF", "#A29BFE", "#FD79A8",
];

/// Pick a display color from the palette
pub fn random_color() -> String {
    use rand::Rng;
    let idx = rand::rng().random_range(0..COLOR_PALETTE.len());
    COLOR_PALETTE[idx].to_string()
}
