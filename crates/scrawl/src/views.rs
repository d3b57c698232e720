//! View models for the two kinds of screen.
//!
//! Both are pure functions of a [`RoomSnapshot`]: a client polls, builds
//! the view, and renders it. Nothing here talks to the server.

use serde::Serialize;

use scrawl_protocol::{RoomCode, RoomSnapshot, RoomStatus, SessionId};

/// One face in the host's roster strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub avatar: String,
    pub name: String,
    pub submitted: bool,
    pub score: i64,
    /// Judge's remark, empty until results.
    pub comment: String,
}

/// What the shared screen (TV, laptop) shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostView {
    pub room_code: RoomCode,
    pub status: RoomStatus,
    /// Empty in `LOBBY`.
    pub topic: String,
    /// Players in join order.
    pub roster: Vec<RosterEntry>,
    /// Whether the start button is enabled.
    pub can_start: bool,
    pub submitted: usize,
    pub total: usize,
}

impl HostView {
    pub fn from_snapshot(snapshot: &RoomSnapshot) -> Self {
        let roster: Vec<RosterEntry> = snapshot
            .players
            .iter()
            .map(|p| RosterEntry {
                avatar: p.avatar.clone(),
                name: p.display_name.clone(),
                submitted: p.has_submitted(),
                score: p.score,
                comment: p.comment.clone(),
            })
            .collect();

        Self {
            room_code: snapshot.room_code.clone(),
            status: snapshot.status,
            topic: snapshot.topic.clone(),
            can_start: snapshot.status == RoomStatus::Lobby && !roster.is_empty(),
            submitted: snapshot.submitted_count(),
            total: roster.len(),
            roster,
        }
    }

    /// Everyone has handed in a drawing.
    pub fn all_submitted(&self) -> bool {
        self.total > 0 && self.submitted == self.total
    }
}

/// Where a phone is in the round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum PlayerStage {
    /// Not joined yet; show the role picker. Joining is open in every
    /// status, so a latecomer lands straight in the current stage.
    PickRole,
    /// Joined; waiting for the host to start.
    Waiting,
    /// Round is on.
    Drawing { topic: String, submitted: bool },
    Judging,
    Results { score: i64, comment: String },
}

/// What one phone shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    pub room_code: RoomCode,
    /// This device's name and avatar, once joined.
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub stage: PlayerStage,
}

impl PlayerView {
    pub fn from_snapshot(snapshot: &RoomSnapshot, session_id: &SessionId) -> Self {
        let me = snapshot.player(session_id);
        let stage = match (me, snapshot.status) {
            (None, _) => PlayerStage::PickRole,
            (Some(_), RoomStatus::Lobby) => PlayerStage::Waiting,
            (Some(p), RoomStatus::Playing) => PlayerStage::Drawing {
                topic: snapshot.topic.clone(),
                submitted: p.has_submitted(),
            },
            (Some(_), RoomStatus::Judging) => PlayerStage::Judging,
            (Some(p), RoomStatus::Results) => PlayerStage::Results {
                score: p.score,
                comment: p.comment.clone(),
            },
        };

        Self {
            room_code: snapshot.room_code.clone(),
            name: me.map(|p| p.display_name.clone()),
            avatar: me.map(|p| p.avatar.clone()),
            stage,
        }
    }

    pub fn is_joined(&self) -> bool {
        self.name.is_some()
    }
}

#[cfg(test)]
mod tests {
    use scrawl_protocol::{Artifact, PlayerSnapshot, Role};

    use super::*;

    fn player(sid: &str, role: Role, submitted: bool, score: i64) -> PlayerSnapshot {
        PlayerSnapshot {
            session_id: SessionId::from(sid),
            display_name: role.default_name().to_string(),
            role,
            avatar: role.default_avatar().to_string(),
            submission: submitted.then(|| Artifact(vec![1, 2, 3])),
            score,
            comment: String::new(),
        }
    }

    fn snapshot(status: RoomStatus, topic: &str, players: Vec<PlayerSnapshot>) -> RoomSnapshot {
        RoomSnapshot {
            room_code: RoomCode("AB12".into()),
            status,
            topic: topic.into(),
            players,
            updated_at: 7,
        }
    }

    #[test]
    fn test_host_view_empty_lobby_cannot_start() {
        let view = HostView::from_snapshot(&snapshot(RoomStatus::Lobby, "", vec![]));
        assert!(!view.can_start);
        assert!(view.roster.is_empty());
        assert!(!view.all_submitted());
    }

    #[test]
    fn test_host_view_lobby_with_players_can_start() {
        let snap = snapshot(
            RoomStatus::Lobby,
            "",
            vec![player("b", Role::Mom, false, 0), player("a", Role::Dad, false, 0)],
        );
        let view = HostView::from_snapshot(&snap);

        assert!(view.can_start);
        let names: Vec<_> = view.roster.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Mom", "Dad"]);
        assert_eq!(view.roster[0].avatar, "👩");
    }

    #[test]
    fn test_host_view_tracks_submission_progress() {
        let snap = snapshot(
            RoomStatus::Playing,
            "A cat doing taxes",
            vec![
                player("a", Role::Dad, true, 0),
                player("b", Role::Goose, false, 0),
            ],
        );
        let view = HostView::from_snapshot(&snap);

        assert!(!view.can_start);
        assert_eq!(view.topic, "A cat doing taxes");
        assert_eq!((view.submitted, view.total), (1, 2));
        assert!(!view.all_submitted());
    }

    #[test]
    fn test_player_view_stages() {
        let me = SessionId::from("a");
        let cases = [
            (RoomStatus::Lobby, PlayerStage::Waiting),
            (
                RoomStatus::Playing,
                PlayerStage::Drawing {
                    topic: "A confused robot".into(),
                    submitted: true,
                },
            ),
            (RoomStatus::Judging, PlayerStage::Judging),
            (
                RoomStatus::Results,
                PlayerStage::Results {
                    score: 5,
                    comment: String::new(),
                },
            ),
        ];

        for (status, expected) in cases {
            let topic = if status == RoomStatus::Lobby { "" } else { "A confused robot" };
            let snap = snapshot(status, topic, vec![player("a", Role::Monkey, true, 5)]);
            let view = PlayerView::from_snapshot(&snap, &me);
            assert_eq!(view.stage, expected, "status {status}");
            assert_eq!(view.name.as_deref(), Some("Monkey (son)"));
        }
    }

    #[test]
    fn test_player_view_not_joined() {
        let stranger = SessionId::from("zzz");

        let lobby = snapshot(RoomStatus::Lobby, "", vec![player("a", Role::Dad, false, 0)]);
        let view = PlayerView::from_snapshot(&lobby, &stranger);
        assert_eq!(view.stage, PlayerStage::PickRole);
        assert!(!view.is_joined());

        let playing = snapshot(RoomStatus::Playing, "x", vec![player("a", Role::Dad, false, 0)]);
        let view = PlayerView::from_snapshot(&playing, &stranger);
        assert_eq!(view.stage, PlayerStage::PickRole);
    }

    #[test]
    fn test_player_stage_json_shape() {
        let stage = PlayerStage::Drawing {
            topic: "A snowman at the beach".into(),
            submitted: false,
        };
        let json = serde_json::to_value(&stage).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "stage": "drawing",
                "topic": "A snowman at the beach",
                "submitted": false,
            })
        );
    }
}
