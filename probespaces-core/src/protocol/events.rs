//! Inbound and outbound protocol events

use super::replies::{CreateSpaceReply, JoinSpaceReply, SpaceInfoReply};
use crate::space::space::Participant;
use crate::space::types::ParticipantId;
use serde::{Deserialize, Serialize};

/// Inbound events accepted from a client connection
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    /// Open a new space; the sender becomes its host
    CreateSpace {
        #[serde(default)]
        user_name: Option<String>,
    },
    /// Join an existing space by id
    JoinSpace {
        space_id: String,
        #[serde(default)]
        user_name: Option<String>,
    },
    /// Detach from the current space without closing the connection
    LeaveSpace,
    SyncUrl {
        url: String,
    },
    SyncScroll {
        x: f64,
        y: f64,
    },
    SyncCursor {
        x: f64,
        y: f64,
    },
    SyncSelection {
        text: String,
        range: serde_json::Value,
    },
    SyncClick {
        x: f64,
        y: f64,
        element: String,
    },
    /// Read-only snapshot request; needs no session binding
    GetSpaceInfo {
        space_id: String,
    },
}

/// Why a space was torn down
///
/// Serialized as the human-readable reason string clients display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CloseReason {
    #[serde(rename = "Host left the space")]
    HostLeft,
    #[serde(rename = "Last participant left")]
    LastParticipantLeft,
}

/// Outbound events pushed to clients
///
/// The first three are unicast replies delivered only to the requesting
/// connection; the rest are room broadcasts with the sender excluded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    SpaceCreated(CreateSpaceReply),
    JoinResult(JoinSpaceReply),
    SpaceInfo(SpaceInfoReply),

    UserJoined {
        user: Participant,
    },
    UserLeft {
        user_id: ParticipantId,
        user_name: String,
    },
    SpaceClosed {
        reason: CloseReason,
    },
    UrlChanged {
        url: String,
        user_id: ParticipantId,
        user_name: String,
    },
    ScrollChanged {
        x: f64,
        y: f64,
        user_id: ParticipantId,
    },
    CursorMoved {
        user_id: ParticipantId,
        user_name: String,
        color: String,
        x: f64,
        y: f64,
    },
    SelectionChanged {
        user_id: ParticipantId,
        user_name: String,
        color: String,
        text: String,
        range: serde_json::Value,
    },
    ClickOccurred {
        user_id: ParticipantId,
        user_name: String,
        color: String,
        x: f64,
        y: f64,
        element: String,
    },
}
