//! Fan-out capability provided by the transport layer

use crate::protocol::ServerEvent;
use crate::space::types::{ConnectionId, SpaceId};

/// Group fan-out as exposed by the connection transport
///
/// This is the only transport surface the coordinator depends on. Sends are
/// fire-and-forget to already-open connections: they never block and no
/// acknowledgment is awaited. A broadcast to a group with no eligible
/// recipients is valid and delivers nothing.
pub trait Broadcaster: Send + Sync {
    /// Add a connection to a space's delivery group
    fn join_space(&self, space: &SpaceId, connection: ConnectionId);

    /// Remove a connection from a space's delivery group
    fn leave_space(&self, space: &SpaceId, connection: ConnectionId);

    /// Drop a space's delivery group entirely
    fn close_space(&self, space: &SpaceId);

    /// Send an event to every member of a space, optionally excluding one
    /// connection (typically the sender)
    fn broadcast(&self, space: &SpaceId, exclude: Option<ConnectionId>, event: &ServerEvent);
}
