//! Core protocol types for Scrawl's wire format.
//!
//! Two families live here:
//!
//! - **Room data** ([`RoomStatus`], [`Role`], [`PlayerSnapshot`],
//!   [`RoomSnapshot`]): the read-only picture of the room that every
//!   polling client renders.
//! - **Messages** ([`Request`], [`Response`], [`Envelope`]): what clients
//!   ask for and what the server answers. Every request gets exactly one
//!   response; the server never pushes.

use std::collections::HashMap;
use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Opaque per-device session identifier.
///
/// Supplied by the client adapter and never regenerated for the same
/// device within a room's lifetime. The server treats it as an opaque key;
/// it is not a credential.
///
/// `#[serde(transparent)]` keeps it a plain JSON string, which also lets it
/// be used as a JSON object key (see [`Request::AdvanceToResults`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Short code shown on the host screen so players know which room they
/// are looking at. Regenerated on every reset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(pub String);

impl RoomCode {
    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Role: the fixed identity catalog
// ---------------------------------------------------------------------------

/// The fixed set of identities a player can pick.
///
/// Uniqueness is not enforced: two phones may both pick `Dad`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Dad,
    Mom,
    Goose,
    Monkey,
}

impl Role {
    /// Every role, in the order the picker shows them.
    pub const ALL: [Role; 4] = [Role::Dad, Role::Mom, Role::Goose, Role::Monkey];

    /// The wire id of this role (`"dad"`, `"mom"`, ...).
    pub fn id(self) -> &'static str {
        match self {
            Self::Dad => "dad",
            Self::Mom => "mom",
            Self::Goose => "goose",
            Self::Monkey => "monkey",
        }
    }

    /// Name shown on the picker card.
    pub fn default_name(self) -> &'static str {
        match self {
            Self::Dad => "Dad",
            Self::Mom => "Mom",
            Self::Goose => "Goose (daughter)",
            Self::Monkey => "Monkey (son)",
        }
    }

    /// Glyph shown on the host roster.
    pub fn default_avatar(self) -> &'static str {
        match self {
            Self::Dad => "🧔",
            Self::Mom => "👩",
            Self::Goose => "👧",
            Self::Monkey => "👦",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// ---------------------------------------------------------------------------
// RoomStatus: the round state machine
// ---------------------------------------------------------------------------

/// Where the room is in the current round.
///
/// Transitions are strictly ordered, with no way back:
///
/// ```text
/// Lobby → Playing → Judging → Results
/// ```
///
/// Starting over is a `reset`, which is not a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    Lobby,
    Playing,
    Judging,
    Results,
}

impl RoomStatus {
    /// Returns the next status in the round, or `None` from `Results`.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Lobby => Some(Self::Playing),
            Self::Playing => Some(Self::Judging),
            Self::Judging => Some(Self::Results),
            Self::Results => None,
        }
    }

    /// Returns `true` if moving to `target` is a single forward step.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }

    /// Returns `true` if drawings may be submitted.
    pub fn accepts_submissions(self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Returns `true` if a round topic must be set in this status.
    pub fn has_topic(self) -> bool {
        !matches!(self, Self::Lobby)
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lobby => write!(f, "LOBBY"),
            Self::Playing => write!(f, "PLAYING"),
            Self::Judging => write!(f, "JUDGING"),
            Self::Results => write!(f, "RESULTS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// A submitted drawing. The room never looks inside it.
///
/// On the wire it is a standard base64 string, since every snapshot
/// carries every drawing to every polling client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact(pub Vec<u8>);

impl Artifact {
    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Artifact {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl Serialize for Artifact {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for Artifact {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}

/// One participant, as seen by a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub session_id: SessionId,
    pub display_name: String,
    pub role: Role,
    pub avatar: String,
    /// `None` until the player submits during `PLAYING`.
    pub submission: Option<Artifact>,
    /// Zero until a judging step applies a delta.
    pub score: i64,
    /// Judge's remark, empty until a judging step writes one.
    #[serde(default)]
    pub comment: String,
}

impl PlayerSnapshot {
    pub fn has_submitted(&self) -> bool {
        self.submission.is_some()
    }
}

/// An owned, immutable copy of the room at one instant.
///
/// Nothing in here points back into the live room, so renderers can hold
/// it for as long as they like while other clients keep mutating the room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub room_code: RoomCode,
    pub status: RoomStatus,
    /// Empty in `LOBBY`, non-empty otherwise.
    pub topic: String,
    /// Players in join order.
    pub players: Vec<PlayerSnapshot>,
    /// Milliseconds since the room was created, at the last mutation.
    /// Only meant for change detection.
    pub updated_at: u64,
}

impl RoomSnapshot {
    /// Looks up a player by session.
    pub fn player(&self, session_id: &SessionId) -> Option<&PlayerSnapshot> {
        self.players.iter().find(|p| &p.session_id == session_id)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Number of players holding a submission.
    pub fn submitted_count(&self) -> usize {
        self.players.iter().filter(|p| p.has_submitted()).count()
    }
}

// ---------------------------------------------------------------------------
// Request / Response
// ---------------------------------------------------------------------------

/// Client → Server: one operation against the room.
///
/// Internally tagged, so `{"type": "Snapshot"}` or
/// `{"type": "Join", "session_id": "...", ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    /// Must be the first request on a connection.
    Hello { version: u32 },

    /// Read the current room state. This is what every poll sends.
    Snapshot,

    /// Clear the roster, regenerate the room code, go back to `LOBBY`.
    Reset,

    /// Register this device. Repeating it with the same `session_id` has
    /// no further effect.
    Join {
        session_id: SessionId,
        name: String,
        role: Role,
        avatar: String,
    },

    /// Start the round. Without a topic, the server asks its topic source.
    StartRound {
        #[serde(default)]
        topic: Option<String>,
    },

    /// Hand in (or replace) this device's drawing.
    Submit {
        session_id: SessionId,
        artifact: Artifact,
    },

    AdvanceToJudging,

    /// Apply score deltas (and optional judge comments) and show results.
    /// Unknown sessions are skipped.
    AdvanceToResults {
        scores: HashMap<SessionId, i64>,
        #[serde(default)]
        comments: HashMap<SessionId, String>,
    },
}

/// Server → Client: the single answer to a [`Request`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    /// Reply to `Hello`.
    Welcome {
        room_code: RoomCode,
        server_time: u64,
    },

    /// Reply to `Snapshot`.
    Snapshot { room: RoomSnapshot },

    /// Reply to `Join`. `newly_joined` is `false` when the session was
    /// already registered and nothing changed.
    Joined {
        player: PlayerSnapshot,
        newly_joined: bool,
    },

    /// Reply to `StartRound`, carrying the topic that was stored.
    RoundStarted { topic: String },

    /// Reply to `Submit`. `recorded` is `false` when the session is
    /// unknown and the drawing was dropped.
    Submitted { recorded: bool },

    /// Reply to `Reset` and the advance requests: the status afterwards.
    Ack { status: RoomStatus },

    /// The request was malformed or rejected by the room.
    /// `code` follows HTTP conventions (400 = bad request,
    /// 409 = rejected by the room's rules).
    Error { code: u16, message: String },
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// The content of an envelope.
///
/// Adjacently tagged:
///   `{ "type": "Request", "data": { "type": "Snapshot" } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Payload {
    Request(Request),
    Response(Response),
}

/// The top-level message wrapper. Every frame on the wire is an Envelope.
///
/// Responses echo the `seq` of the request they answer, so a client can
/// match them up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub seq: u64,

    /// Milliseconds since the sender started.
    pub timestamp: u64,

    pub payload: Payload,
}

// =========================================================================
// Tests
// =========================================================================
