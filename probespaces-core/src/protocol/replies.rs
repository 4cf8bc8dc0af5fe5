//! Reply payloads for request-style inbound events

use crate::space::registry::SpaceError;
use crate::space::space::Participant;
use crate::space::state::SharedState;
use crate::space::types::{ParticipantId, SpaceId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Reply to `create-space`
///
/// Creation cannot fail, so `success` is always true; the field is kept for a
/// uniform reply shape across request events.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpaceReply {
    pub success: bool,
    pub space_id: SpaceId,
    pub user_id: ParticipantId,
    pub invite_link: String,
    pub participants: Vec<Participant>,
}

/// Reply to `join-space`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinSpaceReply {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<ParticipantId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_id: Option<SpaceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participants: Option<Vec<Participant>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<SharedState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JoinSpaceReply {
    pub fn joined(
        user_id: ParticipantId,
        space_id: SpaceId,
        participants: Vec<Participant>,
        state: SharedState,
    ) -> Self {
        Self {
            success: true,
            user_id: Some(user_id),
            space_id: Some(space_id),
            participants: Some(participants),
            state: Some(state),
            error: None,
        }
    }

    pub fn rejected(error: SpaceError) -> Self {
        Self {
            success: false,
            user_id: None,
            space_id: None,
            participants: None,
            state: None,
            error: Some(error.to_string()),
        }
    }
}

/// Read-only projection of a live space
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceSnapshot {
    pub id: SpaceId,
    pub participants: Vec<Participant>,
    pub state: SharedState,
    pub created_at: DateTime<Utc>,
}

/// Reply to `get-space-info`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceInfoReply {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space: Option<SpaceSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SpaceInfoReply {
    pub fn found(space: SpaceSnapshot) -> Self {
        Self {
            success: true,
            space: Some(space),
            error: None,
        }
    }

    pub fn rejected(error: SpaceError) -> Self {
        Self {
            success: false,
            space: None,
            error: Some(error.to_string()),
        }
    }
}

/// Listing entry for the HTTP space directory
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceSummary {
    pub id: SpaceId,
    pub participant_count: usize,
    /// Host display name
    pub host: String,
    pub created_at: DateTime<Utc>,
}
