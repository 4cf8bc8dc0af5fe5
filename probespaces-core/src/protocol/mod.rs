//! Wire protocol
//!
//! Events are single JSON objects discriminated by a `type` field: kebab-case
//! event names, camelCase payload fields. Inbound events may expect one
//! asynchronous reply; outbound events are pushed with no reply expected.

pub mod events;
pub mod replies;

pub use events::{ClientEvent, CloseReason, ServerEvent};
pub use replies::{
    CreateSpaceReply, JoinSpaceReply, SpaceInfoReply, SpaceSnapshot, SpaceSummary,
};
