//! Error types for the protocol layer.
//!
//! Each crate in Scrawl defines its own error enum, so a `ProtocolError`
//! always means a serialization problem, never a networking or room-policy
//! one.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: malformed JSON, missing required fields, an unknown
    /// request `type`, or a role id outside the fixed catalog.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message decoded fine but breaks protocol rules, e.g. a request
    /// arriving before `Hello`, or a response sent where a request belongs.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
