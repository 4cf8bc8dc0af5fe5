//! Space lifecycle
//!
//! A Space is one collaborative browsing session: the roster of participants
//! watching it, the shared browsing state they mirror, and the host
//! relationship that bounds its lifetime. A Space exists in the registry only
//! while its roster is non-empty and its host has not left.

pub mod registry;
pub mod space;
pub mod state;
pub mod types;

pub use registry::{SpaceError, SpaceRegistry};
pub use space::{HostInfo, Participant, Space};
pub use state::{CursorPosition, ScrollPosition, Selection, SharedState};
pub use types::{ConnectionId, ParticipantId, SpaceId};
