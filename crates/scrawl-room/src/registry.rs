//! Player registry operations: joining and recording submissions.

use scrawl_protocol::{Artifact, PlayerSnapshot, Role, SessionId};

use crate::room::{Player, Room};
use crate::RoomError;

/// Result of [`Room::join`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    /// The registration as it stands after the call.
    pub player: PlayerSnapshot,
    /// `false` when the session was already registered; nothing changed.
    pub newly_joined: bool,
}

/// Result of [`Room::record_submission`] when the room is accepting
/// drawings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Stored. `replaced` is `true` if an earlier drawing was overwritten.
    Recorded { replaced: bool },
    /// The session never joined; the drawing was dropped.
    UnknownSession,
}

impl SubmitOutcome {
    pub fn is_recorded(self) -> bool {
        matches!(self, Self::Recorded { .. })
    }
}

impl Room {
    /// Registers a session.
    ///
    /// Idempotent: if `session_id` is already registered, the existing
    /// record is returned unchanged (name, role, and avatar from the first
    /// call win) and `updated_at` does not move.
    ///
    /// Works in every status. A phone that picks its role after the round
    /// started still lands on the roster, with no drawing and score 0.
    pub fn join(
        &mut self,
        session_id: SessionId,
        name: impl Into<String>,
        role: Role,
        avatar: impl Into<String>,
    ) -> JoinOutcome {
        if let Some(existing) = self.players.get(&session_id) {
            return JoinOutcome {
                player: existing.snapshot(&session_id),
                newly_joined: false,
            };
        }

        let player = Player {
            display_name: name.into(),
            role,
            avatar: avatar.into(),
            submission: None,
            score: 0,
            comment: String::new(),
        };
        let snapshot = player.snapshot(&session_id);
        self.order.push(session_id.clone());
        self.players.insert(session_id, player);
        self.touch();

        JoinOutcome {
            player: snapshot,
            newly_joined: true,
        }
    }

    /// Stores a drawing for a session, replacing any earlier one.
    ///
    /// # Errors
    /// [`RoomError::SubmissionClosed`] outside `PLAYING`. An unknown
    /// session is not an error: it yields
    /// [`SubmitOutcome::UnknownSession`] and never creates a player.
    pub fn record_submission(
        &mut self,
        session_id: &SessionId,
        artifact: Artifact,
    ) -> Result<SubmitOutcome, RoomError> {
        if !self.status.accepts_submissions() {
            return Err(RoomError::SubmissionClosed(self.status));
        }
        let Some(player) = self.players.get_mut(session_id) else {
            return Ok(SubmitOutcome::UnknownSession);
        };

        let replaced = player.submission.replace(artifact).is_some();
        self.touch();
        Ok(SubmitOutcome::Recorded { replaced })
    }
}
