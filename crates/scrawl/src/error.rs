//! Unified error type for Scrawl.

use scrawl_protocol::ProtocolError;
use scrawl_room::RoomError;
use scrawl_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each wrapped variant generates the `From`
/// impl, so `?` converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ScrawlError {
    /// A transport-level error (bind, connect, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The room refused an operation.
    #[error(transparent)]
    Room(#[from] RoomError),

    /// The server answered a request with `Response::Error`.
    #[error("server rejected request ({code}): {message}")]
    Rejected { code: u16, message: String },

    /// The server answered with a response of the wrong kind.
    #[error("unexpected response to {request}: {response}")]
    UnexpectedResponse {
        request: &'static str,
        response: String,
    },
}

impl ScrawlError {
    /// The HTTP-style code this error is reported with on the wire.
    pub fn wire_code(&self) -> u16 {
        match self {
            Self::Room(_) => 409,
            Self::Rejected { code, .. } => *code,
            _ => 400,
        }
    }
}
