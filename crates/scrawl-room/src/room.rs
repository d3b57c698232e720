//! The room state store: the single source of truth for one room.
//!
//! [`Room`] is not thread-safe by itself. It's plain data plus
//! methods taking `&mut self`; [`RoomService`](crate::RoomService) puts it
//! behind one mutex so every operation is serialized against every other
//! operation and against `snapshot()`.
//!
//! Operations live in three files, all on this one type:
//!
//! - here: construction, `reset`, `snapshot`, accessors
//! - `registry.rs`: `join`, `record_submission`
//! - `lifecycle.rs`: `start_round`, `advance_to_judging`, `advance_to_results`

use std::collections::HashMap;

use scrawl_protocol::{
    Artifact, PlayerSnapshot, Role, RoomCode, RoomSnapshot, RoomStatus,
    SessionId,
};

use crate::ids::{generate_room_code, next_room_code, MutationClock};
use crate::RoomConfig;

/// One registered participant.
#[derive(Debug, Clone)]
pub(crate) struct Player {
    pub(crate) display_name: String,
    pub(crate) role: Role,
    pub(crate) avatar: String,
    pub(crate) submission: Option<Artifact>,
    pub(crate) score: i64,
    pub(crate) comment: String,
}

impl Player {
    pub(crate) fn snapshot(&self, session_id: &SessionId) -> PlayerSnapshot {
        PlayerSnapshot {
            session_id: session_id.clone(),
            display_name: self.display_name.clone(),
            role: self.role,
            avatar: self.avatar.clone(),
            submission: self.submission.clone(),
            score: self.score,
            comment: self.comment.clone(),
        }
    }
}

/// The live game session.
///
/// Invariants, upheld by every method:
/// - each `SessionId` appears at most once, in `players` and in `order`
/// - `topic` is non-empty exactly when `status` is past `LOBBY`
/// - `status` only moves forward, except through [`Room::reset`]
#[derive(Debug)]
pub struct Room {
    pub(crate) code: RoomCode,
    pub(crate) status: RoomStatus,
    pub(crate) topic: String,
    pub(crate) players: HashMap<SessionId, Player>,
    /// Join order, for display.
    pub(crate) order: Vec<SessionId>,
    pub(crate) updated_at: u64,
    clock: MutationClock,
    code_len: usize,
}

impl Room {
    /// Creates an empty room in `LOBBY` with a fresh code.
    pub fn new(config: &RoomConfig) -> Self {
        let mut clock = MutationClock::new();
        let updated_at = clock.tick();
        Self {
            code: generate_room_code(config.room_code_len),
            status: RoomStatus::Lobby,
            topic: String::new(),
            players: HashMap::new(),
            order: Vec::new(),
            updated_at,
            clock,
            code_len: config.room_code_len,
        }
    }

    /// Clears the roster, issues a new room code, and returns to `LOBBY`.
    ///
    /// Legal from every status; this is how a new round begins.
    pub fn reset(&mut self) {
        self.code = next_room_code(self.code_len, &self.code);
        self.status = RoomStatus::Lobby;
        self.topic.clear();
        self.players.clear();
        self.order.clear();
        self.touch();
    }

    /// Returns an owned copy of the whole room, players in join order.
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            room_code: self.code.clone(),
            status: self.status,
            topic: self.topic.clone(),
            players: self
                .order
                .iter()
                .filter_map(|sid| {
                    self.players.get(sid).map(|p| p.snapshot(sid))
                })
                .collect(),
            updated_at: self.updated_at,
        }
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub fn status(&self) -> RoomStatus {
        self.status
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Number of players holding a drawing.
    pub fn submitted_count(&self) -> usize {
        self.players
            .values()
            .filter(|p| p.submission.is_some())
            .count()
    }

    pub fn contains(&self, session_id: &SessionId) -> bool {
        self.players.contains_key(session_id)
    }

    /// Stamp of the last mutation. See [`RoomSnapshot::updated_at`].
    pub fn updated_at(&self) -> u64 {
        self.updated_at
    }

    /// Milliseconds since the room was created.
    pub fn uptime_ms(&self) -> u64 {
        self.clock.elapsed_ms()
    }

    /// Records that something changed.
    pub(crate) fn touch(&mut self) {
        self.updated_at = self.clock.tick();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Asserts the structural invariants every operation must preserve.
    pub(crate) fn assert_invariants(room: &Room) {
        assert_eq!(
            !room.topic.is_empty(),
            room.status.has_topic(),
            "topic/status coupling broken: status={} topic={:?}",
            room.status,
            room.topic
        );
        assert_eq!(room.players.len(), room.order.len());
        for sid in &room.order {
            assert!(room.players.contains_key(sid));
        }
        let mut sorted = room.order.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), room.order.len(), "duplicate session in order");
    }

    #[test]
    fn test_new_room_starts_in_lobby() {
        let room = Room::new(&RoomConfig::default());
        assert_eq!(room.status(), RoomStatus::Lobby);
        assert_eq!(room.topic(), "");
        assert_eq!(room.player_count(), 0);
        assert_eq!(room.code().as_str().len(), 4);
        assert_invariants(&room);
    }

    #[test]
    fn test_reset_regenerates_code_and_advances_clock() {
        let mut room = Room::new(&RoomConfig::default());
        let code = room.code().clone();
        let before = room.updated_at();

        room.reset();

        assert_ne!(room.code(), &code);
        assert!(room.updated_at() > before);
        assert_eq!(room.status(), RoomStatus::Lobby);
        assert_invariants(&room);
    }

    #[test]
    fn test_snapshot_is_detached_from_room() {
        let mut room = Room::new(&RoomConfig::default());
        room.join(SessionId::from("s1"), "Dad", Role::Dad, "🧔");

        let snap = room.snapshot();
        room.reset();

        assert_eq!(snap.players.len(), 1);
        assert_eq!(room.snapshot().players.len(), 0);
    }

    #[test]
    fn test_snapshot_keeps_join_order() {
        let mut room = Room::new(&RoomConfig::default());
        for (sid, role) in [("c", Role::Monkey), ("a", Role::Dad), ("b", Role::Mom)] {
            room.join(SessionId::from(sid), role.default_name(), role, role.default_avatar());
        }

        let order: Vec<_> = room
            .snapshot()
            .players
            .into_iter()
            .map(|p| p.session_id.0)
            .collect();
        assert_eq!(order, ["c", "a", "b"]);
    }
}
