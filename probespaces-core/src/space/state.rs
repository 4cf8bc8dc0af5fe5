//! Shared browsing state mirrored across a space

use super::types::ParticipantId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Scroll offset in page coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollPosition {
    pub x: f64,
    pub y: f64,
}

/// Cursor position in page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorPosition {
    pub x: f64,
    pub y: f64,
}

/// A text selection as reported by a client
///
/// `range` is carried verbatim; the server stores and rebroadcasts it without
/// inspecting its shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub text: String,
    pub range: serde_json::Value,
}

/// Mutable browsing context mirrored to every participant
///
/// Last write wins for every field. Cursor and selection entries exist only
/// for participants that have sent the corresponding update and must be
/// purged when that participant detaches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedState {
    pub current_url: String,
    pub scroll_position: ScrollPosition,
    pub cursors: HashMap<ParticipantId, CursorPosition>,
    pub selections: HashMap<ParticipantId, Selection>,
}

impl SharedState {
    /// Drop the ephemeral entries owned by a departing participant
    pub fn purge_participant(&mut self, participant: &ParticipantId) {
        self.cursors.remove(participant);
        self.selections.remove(participant);
    }
}
