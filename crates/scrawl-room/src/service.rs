//! `RoomService`: the shared, lock-guarded handle to the room.
//!
//! Built once at process start and cloned into every request path. All
//! clones point at the same room. Each method takes the lock once, applies
//! or rejects its effect, and releases it; nothing awaits while holding it,
//! so no client ever waits on another client's I/O.

use std::collections::HashMap;
use std::sync::Arc;

use scrawl_protocol::{Artifact, Role, RoomCode, RoomSnapshot, RoomStatus, SessionId};
use tokio::sync::{watch, Mutex};

use crate::{
    generate_topic, JoinOutcome, Room, RoomConfig, RoomError, SubmitOutcome,
    TopicSource,
};

struct Inner {
    room: Mutex<Room>,
    /// Latest `updated_at`, for callers that prefer waiting to polling.
    changes: watch::Sender<u64>,
    config: RoomConfig,
}

/// Cheap-to-clone handle to the one room of this process.
#[derive(Clone)]
pub struct RoomService {
    inner: Arc<Inner>,
}

impl RoomService {
    /// Creates the room in `LOBBY`.
    pub fn new(config: RoomConfig) -> Self {
        let room = Room::new(&config);
        let (changes, _) = watch::channel(room.updated_at());
        tracing::info!(room_code = %room.code(), "room created");
        Self {
            inner: Arc::new(Inner {
                room: Mutex::new(room),
                changes,
                config,
            }),
        }
    }

    pub fn config(&self) -> &RoomConfig {
        &self.inner.config
    }

    /// Subscribes to change notifications.
    ///
    /// The receiver always holds the latest `updated_at`. It is an
    /// optimization only: a poller that re-reads [`snapshot`](Self::snapshot)
    /// on a timer sees the same states, just later.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.changes.subscribe()
    }

    /// Returns an owned copy of the room.
    pub async fn snapshot(&self) -> RoomSnapshot {
        self.inner.room.lock().await.snapshot()
    }

    pub async fn room_code(&self) -> RoomCode {
        self.inner.room.lock().await.code().clone()
    }

    /// Milliseconds since the room was created.
    pub async fn uptime_ms(&self) -> u64 {
        self.inner.room.lock().await.uptime_ms()
    }

    /// Clears the roster, regenerates the room code, returns to `LOBBY`.
    pub async fn reset(&self) {
        let mut room = self.inner.room.lock().await;
        let previous = room.code().clone();
        room.reset();
        tracing::info!(
            previous = %previous,
            room_code = %room.code(),
            "room reset"
        );
        self.publish(&room);
    }

    /// See [`Room::join`].
    pub async fn join(
        &self,
        session_id: SessionId,
        name: impl Into<String>,
        role: Role,
        avatar: impl Into<String>,
    ) -> JoinOutcome {
        let mut room = self.inner.room.lock().await;
        let outcome = room.join(session_id, name, role, avatar);
        if outcome.newly_joined {
            tracing::info!(
                room_code = %room.code(),
                session_id = %outcome.player.session_id,
                role = %outcome.player.role,
                status = %room.status(),
                players = room.player_count(),
                "player joined"
            );
            self.publish(&room);
        } else {
            tracing::debug!(
                session_id = %outcome.player.session_id,
                "repeat join absorbed"
            );
        }
        outcome
    }

    /// See [`Room::start_round`].
    pub async fn start_round(&self, topic: &str) -> Result<(), RoomError> {
        let mut room = self.inner.room.lock().await;
        room.start_round(topic)?;
        tracing::info!(
            room_code = %room.code(),
            topic = room.topic(),
            players = room.player_count(),
            "round started"
        );
        self.publish(&room);
        Ok(())
    }

    /// Asks `source` for a topic (with the configured timeout and
    /// fallback) and starts the round with it. Returns the stored topic.
    ///
    /// The topic is fetched before the lock is taken, so a slow provider
    /// never blocks other clients.
    pub async fn start_round_generated<S: TopicSource>(
        &self,
        source: &S,
    ) -> Result<String, RoomError> {
        let config = &self.inner.config;
        let topic =
            generate_topic(source, config.topic_timeout, &config.fallback_topic)
                .await;
        self.start_round(&topic).await?;
        Ok(topic)
    }

    /// See [`Room::record_submission`].
    pub async fn submit(
        &self,
        session_id: &SessionId,
        artifact: Artifact,
    ) -> Result<SubmitOutcome, RoomError> {
        let mut room = self.inner.room.lock().await;
        let bytes = artifact.len();
        let outcome = room.record_submission(session_id, artifact)?;
        match outcome {
            SubmitOutcome::Recorded { replaced } => {
                tracing::info!(
                    %session_id,
                    bytes,
                    replaced,
                    submitted = room.submitted_count(),
                    "drawing submitted"
                );
                self.publish(&room);
            }
            SubmitOutcome::UnknownSession => {
                tracing::debug!(%session_id, "submission from unknown session dropped");
            }
        }
        Ok(outcome)
    }

    /// See [`Room::advance_to_judging`].
    pub async fn advance_to_judging(&self) -> Result<RoomStatus, RoomError> {
        let mut room = self.inner.room.lock().await;
        room.advance_to_judging()?;
        tracing::info!(room_code = %room.code(), status = %room.status(), "status advanced");
        self.publish(&room);
        Ok(room.status())
    }

    /// See [`Room::advance_to_results`].
    pub async fn advance_to_results(
        &self,
        scores: &HashMap<SessionId, i64>,
    ) -> Result<RoomStatus, RoomError> {
        self.advance_to_results_with_comments(scores, &HashMap::new())
            .await
    }

    /// See [`Room::advance_to_results_with_comments`].
    pub async fn advance_to_results_with_comments(
        &self,
        scores: &HashMap<SessionId, i64>,
        comments: &HashMap<SessionId, String>,
    ) -> Result<RoomStatus, RoomError> {
        let mut room = self.inner.room.lock().await;
        let applied = room.advance_to_results_with_comments(scores, comments)?;
        tracing::info!(
            room_code = %room.code(),
            status = %room.status(),
            applied,
            skipped = scores.len() - applied,
            comments = comments.len(),
            "status advanced"
        );
        self.publish(&room);
        Ok(room.status())
    }

    fn publish(&self, room: &Room) {
        self.inner.changes.send_replace(room.updated_at());
    }
}

