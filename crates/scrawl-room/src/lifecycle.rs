//! Round lifecycle: the guarded status transitions.
//!
//! ```text
//!            start_round        advance_to_judging      advance_to_results
//!   LOBBY ───────────────→ PLAYING ─────────────→ JUDGING ──────────────→ RESULTS
//!     ↑                                                                      │
//!     └──────────────────────────── reset() ─────────────────────────────────┘
//! ```
//!
//! Each transition checks its guards before touching anything, so a
//! rejected call leaves the room exactly as it was.

use std::collections::HashMap;

use scrawl_protocol::{RoomStatus, SessionId};

use crate::room::Room;
use crate::RoomError;

impl Room {
    /// Opens the round with `topic`.
    ///
    /// The topic is stored trimmed.
    ///
    /// # Errors
    /// - [`RoomError::InvalidTransition`] unless the room is in `LOBBY`
    /// - [`RoomError::EmptyRoster`] if nobody has joined
    /// - [`RoomError::EmptyTopic`] if `topic` is blank
    pub fn start_round(&mut self, topic: &str) -> Result<(), RoomError> {
        self.require_step_to(RoomStatus::Playing)?;
        if self.players.is_empty() {
            return Err(RoomError::EmptyRoster);
        }
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(RoomError::EmptyTopic);
        }

        self.topic = topic.to_string();
        self.status = RoomStatus::Playing;
        self.touch();
        Ok(())
    }

    /// Closes drawing and moves to `JUDGING`.
    ///
    /// Players who never submitted simply have no drawing to judge.
    ///
    /// # Errors
    /// [`RoomError::InvalidTransition`] unless the room is in `PLAYING`.
    pub fn advance_to_judging(&mut self) -> Result<(), RoomError> {
        self.require_step_to(RoomStatus::Judging)?;
        self.status = RoomStatus::Judging;
        self.touch();
        Ok(())
    }

    /// Adds each score delta to its player's score and moves to `RESULTS`.
    ///
    /// Deltas for sessions that never joined are skipped. Returns how many
    /// deltas were applied.
    ///
    /// # Errors
    /// [`RoomError::InvalidTransition`] unless the room is in `JUDGING`.
    pub fn advance_to_results(
        &mut self,
        scores: &HashMap<SessionId, i64>,
    ) -> Result<usize, RoomError> {
        self.advance_to_results_with_comments(scores, &HashMap::new())
    }

    /// Like [`advance_to_results`](Self::advance_to_results), also storing
    /// the judge's remark for each listed player. A later comment replaces
    /// an earlier one; unknown sessions are skipped.
    pub fn advance_to_results_with_comments(
        &mut self,
        scores: &HashMap<SessionId, i64>,
        comments: &HashMap<SessionId, String>,
    ) -> Result<usize, RoomError> {
        self.require_step_to(RoomStatus::Results)?;

        let mut applied = 0;
        for (sid, delta) in scores {
            if let Some(player) = self.players.get_mut(sid) {
                player.score = player.score.saturating_add(*delta);
                applied += 1;
            }
        }
        for (sid, comment) in comments {
            if let Some(player) = self.players.get_mut(sid) {
                player.comment = comment.trim().to_string();
            }
        }

        self.status = RoomStatus::Results;
        self.touch();
        Ok(applied)
    }

    fn require_step_to(&self, requested: RoomStatus) -> Result<(), RoomError> {
        if self.status.can_transition_to(requested) {
            Ok(())
        } else {
            Err(RoomError::InvalidTransition {
                requested,
                actual: self.status,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use scrawl_protocol::{Artifact, Role};

    use super::*;
    use crate::room::tests::assert_invariants;
    use crate::RoomConfig;

    fn sid(s: &str) -> SessionId {
        SessionId::from(s)
    }

    fn room_with_dad() -> Room {
        let mut room = Room::new(&RoomConfig::default());
        room.join(sid("s1"), "Dad", Role::Dad, "🧔");
        room
    }

    #[test]
    fn test_start_round_with_empty_roster_fails() {
        let mut room = Room::new(&RoomConfig::default());

        let err = room.start_round("anything").unwrap_err();

        assert_eq!(err, RoomError::EmptyRoster);
        assert_eq!(room.status(), RoomStatus::Lobby);
        assert_eq!(room.topic(), "");
        assert_invariants(&room);
    }

    #[test]
    fn test_start_round_with_blank_topic_fails() {
        let mut room = room_with_dad();
        assert_eq!(room.start_round("   ").unwrap_err(), RoomError::EmptyTopic);
        assert_eq!(room.status(), RoomStatus::Lobby);
        assert_invariants(&room);
    }

    #[test]
    fn test_start_round_stores_trimmed_topic() {
        let mut room = room_with_dad();
        room.start_round("  A confused robot \n").unwrap();
        assert_eq!(room.status(), RoomStatus::Playing);
        assert_eq!(room.topic(), "A confused robot");
        assert_invariants(&room);
    }

    #[test]
    fn test_start_round_never_moves_backward() {
        let mut room = room_with_dad();
        room.start_round("first").unwrap();

        for _ in 0..3 {
            let status = room.status();
            let err = room.start_round("second").unwrap_err();
            assert_eq!(
                err,
                RoomError::InvalidTransition {
                    requested: RoomStatus::Playing,
                    actual: status,
                }
            );
            assert_eq!(room.topic(), "first");
            assert_eq!(room.status(), status);

            match status {
                RoomStatus::Playing => room.advance_to_judging().unwrap(),
                RoomStatus::Judging => {
                    room.advance_to_results(&HashMap::new()).unwrap();
                }
                _ => {}
            }
        }
    }

    #[test]
    fn test_advance_to_judging_requires_playing() {
        let mut room = room_with_dad();
        let err = room.advance_to_judging().unwrap_err();
        assert_eq!(
            err,
            RoomError::InvalidTransition {
                requested: RoomStatus::Judging,
                actual: RoomStatus::Lobby,
            }
        );
    }

    #[test]
    fn test_advance_to_judging_without_submissions() {
        let mut room = room_with_dad();
        room.start_round("A confused robot").unwrap();
        room.advance_to_judging().unwrap();
        assert_eq!(room.status(), RoomStatus::Judging);
        assert_invariants(&room);
    }

    #[test]
    fn test_advance_to_results_requires_judging() {
        let mut room = room_with_dad();
        room.start_round("A confused robot").unwrap();

        let err = room.advance_to_results(&HashMap::new()).unwrap_err();
        assert_eq!(
            err,
            RoomError::InvalidTransition {
                requested: RoomStatus::Results,
                actual: RoomStatus::Playing,
            }
        );
        assert_eq!(room.status(), RoomStatus::Playing);
    }

    #[test]
    fn test_advance_to_results_skips_unknown_sessions() {
        let mut room = room_with_dad();
        room.start_round("A confused robot").unwrap();
        room.advance_to_judging().unwrap();

        let scores = HashMap::from([(sid("s1"), 5), (sid("ghost"), 9)]);
        let applied = room.advance_to_results(&scores).unwrap();

        assert_eq!(applied, 1);
        assert_eq!(room.player_count(), 1);
        assert_eq!(room.snapshot().players[0].score, 5);
    }

    #[test]
    fn test_advance_to_results_stores_comments() {
        let mut room = room_with_dad();
        room.start_round("A confused robot").unwrap();
        room.advance_to_judging().unwrap();

        let scores = HashMap::from([(sid("s1"), 3)]);
        let comments = HashMap::from([
            (sid("s1"), " Very robotic. ".to_string()),
            (sid("ghost"), "who?".to_string()),
        ]);
        room.advance_to_results_with_comments(&scores, &comments)
            .unwrap();

        let dad = &room.snapshot().players[0];
        assert_eq!(dad.score, 3);
        assert_eq!(dad.comment, "Very robotic.");
        assert_eq!(room.player_count(), 1);
    }

    #[test]
    fn test_comments_cleared_by_reset() {
        let mut room = room_with_dad();
        assert_eq!(room.snapshot().players[0].comment, "");
        room.start_round("A confused robot").unwrap();
        room.advance_to_judging().unwrap();
        room.advance_to_results_with_comments(
            &HashMap::new(),
            &HashMap::from([(sid("s1"), "nice".to_string())]),
        )
        .unwrap();

        room.reset();
        room.join(sid("s1"), "Dad", Role::Dad, "🧔");
        assert_eq!(room.snapshot().players[0].comment, "");
    }

    #[test]
    fn test_results_only_accepts_reset() {
        let mut room = room_with_dad();
        room.start_round("A confused robot").unwrap();
        room.advance_to_judging().unwrap();
        room.advance_to_results(&HashMap::new()).unwrap();

        assert!(room.start_round("again").is_err());
        assert!(room.advance_to_judging().is_err());
        assert!(room.advance_to_results(&HashMap::new()).is_err());
        assert!(room.record_submission(&sid("s1"), Artifact(vec![1])).is_err());

        room.reset();
        assert_eq!(room.status(), RoomStatus::Lobby);
        assert_invariants(&room);
    }

    #[test]
    fn test_round_trip_then_reset() {
        let mut room = Room::new(&RoomConfig::default());
        room.reset();
        room.join(sid("s1"), "Dad", Role::Dad, "🧔");
        room.start_round("A confused robot").unwrap();
        let img = Artifact(vec![0x89, b'P', b'N', b'G']);
        room.record_submission(&sid("s1"), img.clone()).unwrap();
        room.advance_to_judging().unwrap();
        room.advance_to_results(&HashMap::from([(sid("s1"), 5)])).unwrap();

        let snap = room.snapshot();
        assert_eq!(snap.status, RoomStatus::Results);
        assert_eq!(snap.topic, "A confused robot");
        let dad = snap.player(&sid("s1")).unwrap();
        assert_eq!(dad.submission.as_ref(), Some(&img));
        assert_eq!(dad.score, 5);
        assert_invariants(&room);

        room.reset();
        let after = room.snapshot();
        assert!(after.players.is_empty());
        assert_eq!(after.status, RoomStatus::Lobby);
        assert_eq!(after.topic, "");
        assert_ne!(after.room_code, snap.room_code);
        assert_invariants(&room);
    }
}
