//! Per-connection handler: hello and request routing.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Receive Hello → validate version → send Welcome
//!   2. Loop: receive a request → apply it to the room → send one response
//!
//! The server never pushes. Clients learn about other clients' changes by
//! asking for a snapshot again.

use std::sync::Arc;
use std::time::Instant;

use scrawl_protocol::{
    Codec, Envelope, Payload, ProtocolError, Request, Response, RoomStatus,
};
use scrawl_room::TopicSource;
use scrawl_transport::{Connection, WebSocketConnection};

use crate::server::{ServerState, HELLO_TIMEOUT, IDLE_TIMEOUT, PROTOCOL_VERSION};
use crate::ScrawlError;

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<T, C>(
    conn: WebSocketConnection,
    state: Arc<ServerState<T, C>>,
) -> Result<(), ScrawlError>
where
    T: TopicSource,
    C: Codec,
{
    let conn_id = conn.id();
    let start = Instant::now();
    tracing::debug!(%conn_id, "handling new connection");

    // --- Step 1: Hello ---
    perform_hello(&conn, &state, &start).await?;

    tracing::debug!(%conn_id, "client greeted");

    // --- Step 2: Request loop ---
    loop {
        let data = match tokio::time::timeout(IDLE_TIMEOUT, conn.recv()).await {
            Ok(Ok(Some(data))) => data,
            Ok(Ok(None)) => {
                tracing::debug!(%conn_id, "connection closed cleanly");
                break;
            }
            Ok(Err(e)) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
            Err(_) => {
                tracing::debug!(%conn_id, "connection idle, closing");
                let _ = conn.close().await;
                break;
            }
        };

        let envelope: Envelope = match state.codec.decode(&data) {
            Ok(env) => env,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "failed to decode envelope");
                send_error(
                    &conn,
                    &state.codec,
                    400,
                    &format!("malformed envelope: {e}"),
                    0,
                    &start,
                )
                .await?;
                continue;
            }
        };

        let request = match envelope.payload {
            Payload::Request(request) => request,
            Payload::Response(_) => {
                send_error(
                    &conn,
                    &state.codec,
                    400,
                    "expected a request",
                    envelope.seq,
                    &start,
                )
                .await?;
                continue;
            }
        };

        let response = match dispatch(&state, request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "request rejected");
                Response::Error {
                    code: e.wire_code(),
                    message: e.to_string(),
                }
            }
        };

        send_response(&conn, &state.codec, response, envelope.seq, &start).await?;
    }

    Ok(())
}

/// Receives `Hello`, checks the version, and answers with `Welcome`.
async fn perform_hello<T, C>(
    conn: &WebSocketConnection,
    state: &ServerState<T, C>,
    start: &Instant,
) -> Result<(), ScrawlError>
where
    T: TopicSource,
    C: Codec,
{
    let data = match tokio::time::timeout(HELLO_TIMEOUT, conn.recv()).await {
        Ok(Ok(Some(data))) => data,
        Ok(Ok(None)) => {
            return Err(ProtocolError::InvalidMessage(
                "connection closed before hello".into(),
            )
            .into());
        }
        Ok(Err(e)) => return Err(ScrawlError::Transport(e)),
        Err(_) => {
            return Err(
                ProtocolError::InvalidMessage("hello timed out".into()).into()
            );
        }
    };

    let envelope: Envelope = match state.codec.decode(&data) {
        Ok(env) => env,
        Err(e) => {
            send_error(
                conn,
                &state.codec,
                400,
                &format!("malformed hello: {e}"),
                0,
                start,
            )
            .await?;
            return Err(e.into());
        }
    };

    let version = match envelope.payload {
        Payload::Request(Request::Hello { version }) => version,
        _ => {
            send_error(conn, &state.codec, 400, "expected Hello", envelope.seq, start)
                .await?;
            return Err(ProtocolError::InvalidMessage(
                "first message must be Hello".into(),
            )
            .into());
        }
    };

    if version != PROTOCOL_VERSION {
        send_error(
            conn,
            &state.codec,
            400,
            &format!("version mismatch: expected {PROTOCOL_VERSION}, got {version}"),
            envelope.seq,
            start,
        )
        .await?;
        let _ = conn.close().await;
        return Err(ProtocolError::InvalidMessage(
            "protocol version mismatch".into(),
        )
        .into());
    }

    let welcome = Response::Welcome {
        room_code: state.room.room_code().await,
        server_time: state.room.uptime_ms().await,
    };
    send_response(conn, &state.codec, welcome, envelope.seq, start).await
}

/// Applies one request to the room and builds its response.
async fn dispatch<T, C>(
    state: &ServerState<T, C>,
    request: Request,
) -> Result<Response, ScrawlError>
where
    T: TopicSource,
    C: Codec,
{
    let room = &state.room;
    let response = match request {
        Request::Hello { .. } => {
            return Err(ProtocolError::InvalidMessage("already greeted".into()).into());
        }

        Request::Snapshot => Response::Snapshot {
            room: room.snapshot().await,
        },

        Request::Reset => {
            room.reset().await;
            Response::Ack {
                status: RoomStatus::Lobby,
            }
        }

        Request::Join {
            session_id,
            name,
            role,
            avatar,
        } => {
            let outcome = room.join(session_id, name, role, avatar).await;
            Response::Joined {
                player: outcome.player,
                newly_joined: outcome.newly_joined,
            }
        }

        Request::StartRound { topic: Some(topic) } => {
            room.start_round(&topic).await?;
            Response::RoundStarted {
                topic: topic.trim().to_string(),
            }
        }

        Request::StartRound { topic: None } => Response::RoundStarted {
            topic: room.start_round_generated(&state.topics).await?,
        },

        Request::Submit {
            session_id,
            artifact,
        } => Response::Submitted {
            recorded: room.submit(&session_id, artifact).await?.is_recorded(),
        },

        Request::AdvanceToJudging => Response::Ack {
            status: room.advance_to_judging().await?,
        },

        Request::AdvanceToResults { scores, comments } => Response::Ack {
            status: room
                .advance_to_results_with_comments(&scores, &comments)
                .await?,
        },
    };
    Ok(response)
}

/// Wraps `response` in an envelope answering request `seq` and sends it.
async fn send_response(
    conn: &WebSocketConnection,
    codec: &impl Codec,
    response: Response,
    seq: u64,
    start: &Instant,
) -> Result<(), ScrawlError> {
    let envelope = Envelope {
        seq,
        timestamp: start.elapsed().as_millis() as u64,
        payload: Payload::Response(response),
    };
    let bytes = codec.encode(&envelope)?;
    conn.send(&bytes).await.map_err(ScrawlError::Transport)?;
    Ok(())
}

/// Sends a `Response::Error` envelope to the client.
async fn send_error(
    conn: &WebSocketConnection,
    codec: &impl Codec,
    code: u16,
    message: &str,
    seq: u64,
    start: &Instant,
) -> Result<(), ScrawlError> {
    let response = Response::Error {
        code,
        message: message.to_string(),
    };
    send_response(conn, codec, response, seq, start).await
}
