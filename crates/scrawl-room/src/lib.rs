//! Room coordination for Scrawl.
//!
//! One process hosts exactly one room. Every client (the host screen and
//! each player phone) polls it independently, so all coordination happens
//! through this crate's shared state.
//!
//! # Key types
//!
//! - [`Room`]: the single authoritative room state. Plain data plus the
//!   registry and lifecycle operations; not thread-safe on its own.
//! - [`RoomService`]: the clonable handle every request path holds. Wraps
//!   the room in one mutex so each operation is atomic.
//! - [`RoomError`]: rejections by room policy.
//! - [`TopicSource`]: where round prompts come from, with a fallback.
//! - [`RoomConfig`]: room code length, topic timeout, fallback topic.

#![allow(async_fn_in_trait)]

mod config;
mod error;
mod ids;
mod lifecycle;
mod registry;
mod room;
mod service;
mod topic;

pub use config::RoomConfig;
pub use error::RoomError;
pub use ids::{generate_room_code, new_session_id};
pub use registry::{JoinOutcome, SubmitOutcome};
pub use room::Room;
pub use service::RoomService;
pub use topic::{generate_topic, StaticTopics, TopicError, TopicSource};

pub use scrawl_protocol::{
    Artifact, PlayerSnapshot, Role, RoomCode, RoomSnapshot, RoomStatus,
    SessionId,
};
