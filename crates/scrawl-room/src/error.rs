//! Error types for the room layer.

use scrawl_protocol::RoomStatus;

/// Ways the room can refuse an operation.
///
/// Every variant leaves the room untouched. Benign races (joining twice,
/// submitting from an unknown session, scoring an unknown session) are
/// not errors; see [`JoinOutcome`](crate::JoinOutcome) and
/// [`SubmitOutcome`](crate::SubmitOutcome).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// A status change was requested from the wrong status.
    #[error("cannot move to {requested} while the room is {actual}")]
    InvalidTransition {
        requested: RoomStatus,
        actual: RoomStatus,
    },

    /// A round can't start with nobody in the room.
    #[error("cannot start a round with no players")]
    EmptyRoster,

    /// A round can't start with a blank topic.
    #[error("cannot start a round without a topic")]
    EmptyTopic,

    /// A drawing arrived outside `PLAYING`.
    #[error("room is {0}, drawings are only accepted while PLAYING")]
    SubmissionClosed(RoomStatus),
}
