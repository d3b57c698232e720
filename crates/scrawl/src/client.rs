//! `RoomClient`: the host screen's or a phone's connection to the room.
//!
//! Every call is one request and one response. There is no push: to follow
//! the room, call [`RoomClient::poll`], which re-reads the snapshot on a
//! fixed interval and hands each one to a render callback.

use std::collections::HashMap;
use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use scrawl_protocol::{
    Artifact, Codec, Envelope, JsonCodec, Payload, ProtocolError, Request,
    Response, Role, RoomCode, RoomSnapshot, RoomStatus, SessionId,
};
use scrawl_room::JoinOutcome;
use scrawl_transport::{connect, ClientConnection, Connection, TransportError};
use tokio::time::MissedTickBehavior;

use crate::server::PROTOCOL_VERSION;
use crate::ScrawlError;

/// A connected, greeted client.
pub struct RoomClient {
    conn: ClientConnection,
    codec: JsonCodec,
    seq: u64,
    start: Instant,
    room_code: RoomCode,
    server_time: u64,
}

impl RoomClient {
    /// Dials `url` (e.g. `ws://192.168.1.20:8080`) and says hello.
    ///
    /// # Errors
    /// Fails if the server is unreachable or refuses the protocol version.
    pub async fn connect(url: &str) -> Result<Self, ScrawlError> {
        let conn = connect(url).await?;
        let mut client = Self {
            conn,
            codec: JsonCodec,
            seq: 0,
            start: Instant::now(),
            room_code: RoomCode(String::new()),
            server_time: 0,
        };

        match client
            .call(Request::Hello {
                version: PROTOCOL_VERSION,
            })
            .await?
        {
            Response::Welcome {
                room_code,
                server_time,
            } => {
                client.room_code = room_code;
                client.server_time = server_time;
            }
            other => return Err(unexpected("Hello", other)),
        }

        tracing::debug!(url, room_code = %client.room_code, "joined server");
        Ok(client)
    }

    /// The room code announced in `Welcome`. It goes stale after a reset;
    /// snapshots always carry the current one.
    pub fn room_code(&self) -> &RoomCode {
        &self.room_code
    }

    /// The server's uptime in milliseconds when this client said hello.
    pub fn server_time(&self) -> u64 {
        self.server_time
    }

    pub async fn snapshot(&mut self) -> Result<RoomSnapshot, ScrawlError> {
        match self.call(Request::Snapshot).await? {
            Response::Snapshot { room } => Ok(room),
            other => Err(unexpected("Snapshot", other)),
        }
    }

    /// Clears the room and opens a fresh lobby.
    pub async fn reset(&mut self) -> Result<RoomStatus, ScrawlError> {
        self.ack("Reset", Request::Reset).await
    }

    pub async fn join(
        &mut self,
        session_id: SessionId,
        name: impl Into<String>,
        role: Role,
        avatar: impl Into<String>,
    ) -> Result<JoinOutcome, ScrawlError> {
        let request = Request::Join {
            session_id,
            name: name.into(),
            role,
            avatar: avatar.into(),
        };
        match self.call(request).await? {
            Response::Joined {
                player,
                newly_joined,
            } => Ok(JoinOutcome {
                player,
                newly_joined,
            }),
            other => Err(unexpected("Join", other)),
        }
    }

    /// Starts the round. With `None`, the server picks the topic.
    /// Returns the topic that was stored.
    pub async fn start_round(
        &mut self,
        topic: Option<String>,
    ) -> Result<String, ScrawlError> {
        match self.call(Request::StartRound { topic }).await? {
            Response::RoundStarted { topic } => Ok(topic),
            other => Err(unexpected("StartRound", other)),
        }
    }

    /// Hands in a drawing. Returns `false` if the server didn't know the
    /// session and dropped it.
    pub async fn submit(
        &mut self,
        session_id: SessionId,
        artifact: Artifact,
    ) -> Result<bool, ScrawlError> {
        let request = Request::Submit {
            session_id,
            artifact,
        };
        match self.call(request).await? {
            Response::Submitted { recorded } => Ok(recorded),
            other => Err(unexpected("Submit", other)),
        }
    }

    pub async fn advance_to_judging(&mut self) -> Result<RoomStatus, ScrawlError> {
        self.ack("AdvanceToJudging", Request::AdvanceToJudging).await
    }

    pub async fn advance_to_results(
        &mut self,
        scores: HashMap<SessionId, i64>,
    ) -> Result<RoomStatus, ScrawlError> {
        self.advance_to_results_with_comments(scores, HashMap::new())
            .await
    }

    /// Applies score deltas and stores a judge's remark per player.
    pub async fn advance_to_results_with_comments(
        &mut self,
        scores: HashMap<SessionId, i64>,
        comments: HashMap<SessionId, String>,
    ) -> Result<RoomStatus, ScrawlError> {
        let request = Request::AdvanceToResults { scores, comments };
        self.ack("AdvanceToResults", request).await
    }

    /// Fetches a snapshot every `interval` and passes it to `render` until
    /// `render` breaks.
    ///
    /// The first snapshot is fetched immediately. A slow round trip delays
    /// the next tick rather than bunching ticks up.
    pub async fn poll<F>(
        &mut self,
        interval: Duration,
        mut render: F,
    ) -> Result<(), ScrawlError>
    where
        F: FnMut(&RoomSnapshot) -> ControlFlow<()>,
    {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let snapshot = self.snapshot().await?;
            if render(&snapshot).is_break() {
                return Ok(());
            }
        }
    }

    pub async fn close(self) -> Result<(), ScrawlError> {
        self.conn.close().await?;
        Ok(())
    }

    async fn ack(
        &mut self,
        name: &'static str,
        request: Request,
    ) -> Result<RoomStatus, ScrawlError> {
        match self.call(request).await? {
            Response::Ack { status } => Ok(status),
            other => Err(unexpected(name, other)),
        }
    }

    /// Sends one request and waits for the response carrying its `seq`.
    async fn call(&mut self, request: Request) -> Result<Response, ScrawlError> {
        self.seq += 1;
        let seq = self.seq;
        let envelope = Envelope {
            seq,
            timestamp: self.start.elapsed().as_millis() as u64,
            payload: Payload::Request(request),
        };
        let bytes = self.codec.encode(&envelope)?;
        self.conn.send(&bytes).await?;

        loop {
            let Some(data) = self.conn.recv().await? else {
                return Err(TransportError::ConnectionClosed(
                    "server closed the connection".into(),
                )
                .into());
            };
            let reply: Envelope = self.codec.decode(&data)?;
            match reply.payload {
                Payload::Response(response) if reply.seq == seq => {
                    return match response {
                        Response::Error { code, message } => {
                            Err(ScrawlError::Rejected { code, message })
                        }
                        response => Ok(response),
                    };
                }
                Payload::Response(_) => {
                    tracing::debug!(
                        expected = seq,
                        got = reply.seq,
                        "skipping stale response"
                    );
                }
                Payload::Request(_) => {
                    return Err(ProtocolError::InvalidMessage(
                        "server sent a request".into(),
                    )
                    .into());
                }
            }
        }
    }
}

fn unexpected(request: &'static str, response: Response) -> ScrawlError {
    ScrawlError::UnexpectedResponse {
        request,
        response: format!("{response:?}"),
    }
}
