//! Wire protocol for Scrawl.
//!
//! This crate defines the "language" that the party clients (one host
//! screen, several player phones) and the room server speak:
//!
//! - **Types** ([`RoomSnapshot`], [`Request`], [`Response`], [`Envelope`],
//!   etc.): the room state as clients see it, and the request/response
//!   messages that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those messages
//!   are converted to/from bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw bytes) and the room
//! (shared state). It doesn't know about connections or locking; it only
//! knows the shapes of the data.
//!
//! ```text
//! Transport (bytes) → Protocol (Envelope) → Room (RoomService)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    Artifact, Envelope, Payload, PlayerSnapshot, Request, Response, Role,
    RoomCode, RoomSnapshot, RoomStatus, SessionId,
};
