//! # Scrawl
//!
//! A party drawing game for one living room.
//!
//! One process hosts one room. A shared screen creates and drives the
//! round; each player's phone joins it, draws to a prompt, and hands in
//! the drawing. Every client polls the server for the room's state, so the
//! server only ever answers requests.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scrawl::prelude::*;
//!
//! # async fn party() -> Result<(), ScrawlError> {
//! // On the host machine:
//! let server = ScrawlServer::builder().bind("0.0.0.0:8080").build().await?;
//! tokio::spawn(server.run());
//!
//! // On a phone:
//! let mut client = RoomClient::connect("ws://192.168.1.20:8080").await?;
//! let me = new_session_id();
//! client.join(me.clone(), "Dad", Role::Dad, "🧔").await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod handler;
mod server;
mod views;

pub use client::RoomClient;
pub use error::ScrawlError;
pub use server::{ScrawlServer, ScrawlServerBuilder, PROTOCOL_VERSION};
pub use views::{HostView, PlayerStage, PlayerView, RosterEntry};

/// Everything a host or client program needs, in one import.
pub mod prelude {
    pub use crate::{
        HostView, PlayerStage, PlayerView, RoomClient, RosterEntry,
        ScrawlError, ScrawlServer, ScrawlServerBuilder, PROTOCOL_VERSION,
    };

    pub use scrawl_protocol::{
        Artifact, Codec, Envelope, JsonCodec, Payload, PlayerSnapshot,
        ProtocolError, Request, Response, Role, RoomCode, RoomSnapshot,
        RoomStatus, SessionId,
    };
    pub use scrawl_room::{
        generate_room_code, new_session_id, JoinOutcome, RoomConfig,
        RoomError, RoomService, StaticTopics, SubmitOutcome, TopicError,
        TopicSource,
    };
    pub use scrawl_transport::TransportError;
}
