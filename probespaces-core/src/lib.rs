//! Probe Spaces core
//!
//! Space lifecycle and state-synchronization protocol for collaborative
//! browsing sessions: the space registry, per-connection session bindings,
//! and the coordinator that applies inbound events and fans updates out
//! through the transport's [`broadcast::Broadcaster`] capability.
//!
//! The crate has no network I/O of its own; the server crate supplies the
//! WebSocket transport and the HTTP surface.

pub mod broadcast;
pub mod config;
pub mod coordinator;
pub mod logging;
pub mod protocol;
pub mod session;
pub mod shutdown;
pub mod space;
pub mod test_utils;

pub use broadcast::Broadcaster;
pub use coordinator::SpaceCoordinator;
pub use logging::{init_logging, LogLevel};
pub use space::{Participant, Space, SpaceError, SpaceRegistry};
