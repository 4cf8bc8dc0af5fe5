//! Event coordinator
//!
//! Applies inbound protocol events to the space registry and fans the
//! resulting updates out through the transport's [`Broadcaster`]. All
//! registry and session mutation happens under a single lock, so a
//! mutate-then-broadcast sequence never interleaves with another event and
//! members of one space observe events in lock acquisition order.

use crate::broadcast::Broadcaster;
use crate::protocol::{
    ClientEvent, CloseReason, CreateSpaceReply, JoinSpaceReply, ServerEvent, SpaceInfoReply,
    SpaceSnapshot, SpaceSummary,
};
use crate::session::SessionTable;
use crate::space::registry::{SpaceError, SpaceRegistry};
use crate::space::space::Space;
use crate::space::state::{CursorPosition, ScrollPosition, Selection};
use crate::space::types::{random_color, ConnectionId, SpaceId};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Longest accepted display name; longer names are truncated before use
const MAX_NAME_LEN: usize = 64;

const DEFAULT_HOST_NAME: &str = "Host";
const DEFAULT_GUEST_NAME: &str = "Guest";

/// Invite link scheme understood by the client extension
const INVITE_LINK_PREFIX: &str = "probe://space/";

/// Field-specific state updates accepted from a bound connection
#[derive(Debug, Clone)]
pub enum SyncInput {
    Url { url: String },
    Scroll { x: f64, y: f64 },
    Cursor { x: f64, y: f64 },
    Selection { text: String, range: serde_json::Value },
    Click { x: f64, y: f64, element: String },
}

struct CoordinatorState {
    registry: SpaceRegistry,
    sessions: SessionTable,
}

/// The single event-processing context for all spaces
///
/// Owns the registry and the session table; handlers take the inner lock for
/// the full mutate-then-broadcast sequence. On a multi-threaded runtime this
/// lock is what preserves the per-space atomicity the protocol requires: it
/// is a correctness requirement, not an optimization.
pub struct SpaceCoordinator {
    inner: Mutex<CoordinatorState>,
    broadcaster: Arc<dyn Broadcaster>,
}

impl SpaceCoordinator {
    pub fn new(broadcaster: Arc<dyn Broadcaster>) -> Self {
        Self {
            inner: Mutex::new(CoordinatorState {
                registry: SpaceRegistry::new(),
                sessions: SessionTable::new(),
            }),
            broadcaster,
        }
    }

    /// Dispatch one inbound event, returning the reply frame if the event
    /// expects one
    pub async fn handle_event(
        &self,
        connection: ConnectionId,
        event: ClientEvent,
    ) -> Option<ServerEvent> {
        match event {
            ClientEvent::CreateSpace { user_name } => Some(ServerEvent::SpaceCreated(
                self.create_space(connection, user_name).await,
            )),
            ClientEvent::JoinSpace {
                space_id,
                user_name,
            } => Some(ServerEvent::JoinResult(
                self.join_space(connection, &SpaceId::from(space_id), user_name)
                    .await,
            )),
            ClientEvent::LeaveSpace => {
                self.leave(connection).await;
                None
            }
            ClientEvent::SyncUrl { url } => {
                self.sync(connection, SyncInput::Url { url }).await;
                None
            }
            ClientEvent::SyncScroll { x, y } => {
                self.sync(connection, SyncInput::Scroll { x, y }).await;
                None
            }
            ClientEvent::SyncCursor { x, y } => {
                self.sync(connection, SyncInput::Cursor { x, y }).await;
                None
            }
            ClientEvent::SyncSelection { text, range } => {
                self.sync(connection, SyncInput::Selection { text, range })
                    .await;
                None
            }
            ClientEvent::SyncClick { x, y, element } => {
                self.sync(connection, SyncInput::Click { x, y, element })
                    .await;
                None
            }
            ClientEvent::GetSpaceInfo { space_id } => Some(ServerEvent::SpaceInfo(
                self.space_info(&SpaceId::from(space_id)).await,
            )),
        }
    }

    /// Create a new space with the sender as host
    pub async fn create_space(
        &self,
        connection: ConnectionId,
        user_name: Option<String>,
    ) -> CreateSpaceReply {
        let name = sanitize_name(user_name, DEFAULT_HOST_NAME);
        let mut inner = self.inner.lock().await;

        // A connection still bound to another space detaches first, so the
        // membership invariants hold between events, not just at disconnect.
        self.detach(&mut inner, connection);

        let space = Space::new(connection, name, random_color());
        let space_id = space.id.clone();
        let user_id = space.host.user_id.clone();
        let participants = space.participants();

        inner
            .sessions
            .bind(connection, space_id.clone(), user_id.clone());
        inner.registry.insert(space);
        self.broadcaster.join_space(&space_id, connection);

        info!("Created space {} (host {})", space_id, user_id);

        CreateSpaceReply {
            success: true,
            invite_link: format!("{}{}", INVITE_LINK_PREFIX, space_id),
            space_id,
            user_id,
            participants,
        }
    }

    /// Join an existing space
    ///
    /// On success the joiner receives the full roster and current shared
    /// state; everyone else receives `user-joined` before any sync event the
    /// joiner can subsequently trigger.
    pub async fn join_space(
        &self,
        connection: ConnectionId,
        space_id: &SpaceId,
        user_name: Option<String>,
    ) -> JoinSpaceReply {
        let name = sanitize_name(user_name, DEFAULT_GUEST_NAME);
        let mut inner = self.inner.lock().await;

        if !inner.registry.contains(space_id) {
            debug!("Join rejected, space {} not found", space_id);
            return JoinSpaceReply::rejected(SpaceError::SpaceNotFound);
        }

        self.detach(&mut inner, connection);

        // The space can only have vanished above if the joiner was its host.
        let Some(space) = inner.registry.get_mut(space_id) else {
            return JoinSpaceReply::rejected(SpaceError::SpaceNotFound);
        };
        let participant = space.add_participant(connection, name, random_color());
        let participants = space.participants();
        let state = space.state.clone();

        inner
            .sessions
            .bind(connection, space_id.clone(), participant.user_id.clone());
        self.broadcaster.join_space(space_id, connection);
        self.broadcaster.broadcast(
            space_id,
            Some(connection),
            &ServerEvent::UserJoined {
                user: participant.clone(),
            },
        );

        info!("{} joined space {}", participant.name, space_id);

        JoinSpaceReply::joined(participant.user_id, space_id.clone(), participants, state)
    }

    /// Detach a connection from its space
    ///
    /// Explicit `leave-space` and connection loss are treated identically.
    /// No-op for unbound connections.
    pub async fn leave(&self, connection: ConnectionId) {
        let mut inner = self.inner.lock().await;
        self.detach(&mut inner, connection);
    }

    /// Apply a state update from a bound connection and broadcast it
    ///
    /// No-op if the connection is unbound or its space is already gone,
    /// typically a race with a space that just closed.
    pub async fn sync(&self, connection: ConnectionId, input: SyncInput) {
        let mut inner = self.inner.lock().await;

        let Some(binding) = inner.sessions.resolve(connection) else {
            return;
        };
        let space_id = binding.space_id.clone();
        let participant_id = binding.participant_id.clone();

        let Some(space) = inner.registry.get_mut(&space_id) else {
            return;
        };
        let Some(participant) = space.participant(connection) else {
            return;
        };
        // Name and color are read from the roster at broadcast time.
        let user_name = participant.name.clone();
        let color = participant.color.clone();

        let event = match input {
            SyncInput::Url { url } => {
                debug!("URL changed in space {}: {}", space_id, url);
                space.state.current_url = url.clone();
                ServerEvent::UrlChanged {
                    url,
                    user_id: participant_id,
                    user_name,
                }
            }
            SyncInput::Scroll { x, y } => {
                space.state.scroll_position = ScrollPosition { x, y };
                ServerEvent::ScrollChanged {
                    x,
                    y,
                    user_id: participant_id,
                }
            }
            SyncInput::Cursor { x, y } => {
                space
                    .state
                    .cursors
                    .insert(participant_id.clone(), CursorPosition { x, y });
                ServerEvent::CursorMoved {
                    user_id: participant_id,
                    user_name,
                    color,
                    x,
                    y,
                }
            }
            SyncInput::Selection { text, range } => {
                space.state.selections.insert(
                    participant_id.clone(),
                    Selection {
                        text: text.clone(),
                        range: range.clone(),
                    },
                );
                ServerEvent::SelectionChanged {
                    user_id: participant_id,
                    user_name,
                    color,
                    text,
                    range,
                }
            }
            // Clicks are stateless: broadcast only, nothing recorded.
            SyncInput::Click { x, y, element } => ServerEvent::ClickOccurred {
                user_id: participant_id,
                user_name,
                color,
                x,
                y,
                element,
            },
        };

        self.broadcaster
            .broadcast(&space_id, Some(connection), &event);
    }

    /// Read-only snapshot of a space; needs no session binding
    pub async fn space_info(&self, space_id: &SpaceId) -> SpaceInfoReply {
        let inner = self.inner.lock().await;
        match inner.registry.get(space_id) {
            Some(space) => SpaceInfoReply::found(SpaceSnapshot {
                id: space.id.clone(),
                participants: space.participants(),
                state: space.state.clone(),
                created_at: space.created_at,
            }),
            None => SpaceInfoReply::rejected(SpaceError::SpaceNotFound),
        }
    }

    /// Number of live spaces
    pub async fn active_space_count(&self) -> usize {
        self.inner.lock().await.registry.len()
    }

    /// Listing projection for the HTTP directory
    pub async fn list_spaces(&self) -> Vec<SpaceSummary> {
        let inner = self.inner.lock().await;
        inner
            .registry
            .iter()
            .map(|space| SpaceSummary {
                id: space.id.clone(),
                participant_count: space.len(),
                host: space.host.name.clone(),
                created_at: space.created_at,
            })
            .collect()
    }

    /// Remove a connection's roster entry and evaluate the termination rule.
    ///
    /// Order matters: remaining members must observe `user-left` before any
    /// `space-closed`, so a simple departure is distinguishable from a
    /// teardown.
    fn detach(&self, inner: &mut CoordinatorState, connection: ConnectionId) {
        let Some(binding) = inner.sessions.unbind(connection) else {
            return;
        };
        let space_id = binding.space_id;

        let Some(space) = inner.registry.get_mut(&space_id) else {
            return;
        };
        let Some(participant) = space.remove_participant(connection) else {
            return;
        };
        let roster_empty = space.is_empty();

        self.broadcaster.leave_space(&space_id, connection);
        self.broadcaster.broadcast(
            &space_id,
            Some(connection),
            &ServerEvent::UserLeft {
                user_id: participant.user_id.clone(),
                user_name: participant.name.clone(),
            },
        );
        info!("{} left space {}", participant.name, space_id);

        if participant.is_host || roster_empty {
            let reason = if participant.is_host {
                CloseReason::HostLeft
            } else {
                CloseReason::LastParticipantLeft
            };
            self.broadcaster.broadcast(
                &space_id,
                Some(connection),
                &ServerEvent::SpaceClosed { reason },
            );
            inner.registry.remove(&space_id);
            self.broadcaster.close_space(&space_id);
            info!("Closed space {}", space_id);
        }
    }
}

fn sanitize_name(name: Option<String>, fallback: &str) -> String {
    let name = name.map(|n| n.trim().to_string()).unwrap_or_default();
    if name.is_empty() {
        return fallback.to_string();
    }
    name.chars().take(MAX_NAME_LEN).collect()
}
