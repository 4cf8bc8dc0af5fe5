//! Process-wide registry of live spaces

use super::space::Space;
use super::types::SpaceId;
use std::collections::HashMap;

/// Space operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpaceError {
    /// Lookup against an unknown or already-closed space id. The Display
    /// string is the wire error payload.
    #[error("Space not found")]
    SpaceNotFound,
}

/// Registry owning every live Space
///
/// A space is present from creation until its host leaves or its roster
/// empties, whichever comes first. The registry is owned exclusively by the
/// coordinator; nothing else holds a Space beyond the handling of one event.
#[derive(Debug, Default)]
pub struct SpaceRegistry {
    spaces: HashMap<SpaceId, Space>,
}

impl SpaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly created space
    pub fn insert(&mut self, space: Space) {
        self.spaces.insert(space.id.clone(), space);
    }

    pub fn get(&self, id: &SpaceId) -> Option<&Space> {
        self.spaces.get(id)
    }

    pub fn get_mut(&mut self, id: &SpaceId) -> Option<&mut Space> {
        self.spaces.get_mut(id)
    }

    pub fn remove(&mut self, id: &SpaceId) -> Option<Space> {
        self.spaces.remove(id)
    }

    pub fn contains(&self, id: &SpaceId) -> bool {
        self.spaces.contains_key(id)
    }

    /// Number of live spaces
    pub fn len(&self) -> usize {
        self.spaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Space> {
        self.spaces.values()
    }
}
