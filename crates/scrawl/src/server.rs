//! `ScrawlServer` builder and server loop.
//!
//! This is the entry point for hosting a party. It ties the layers
//! together: transport → protocol → room.

use std::sync::Arc;
use std::time::Duration;

use scrawl_protocol::{Codec, JsonCodec};
use scrawl_room::{RoomConfig, RoomService, StaticTopics, TopicSource};
use scrawl_transport::{Transport, WebSocketTransport};

use crate::handler::handle_connection;
use crate::ScrawlError;

/// The current protocol version. Clients must send this in their `Hello`
/// or be turned away.
pub const PROTOCOL_VERSION: u32 = 1;

/// How long a fresh connection may take to say `Hello`.
pub(crate) const HELLO_TIMEOUT: Duration = Duration::from_secs(5);

/// How long a greeted connection may stay silent. Clients poll every
/// couple of seconds, so this only trips on abandoned tabs.
pub(crate) const IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState<T: TopicSource, C: Codec> {
    pub(crate) room: RoomService,
    pub(crate) topics: T,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a Scrawl server.
///
/// # Example
///
/// ```rust,no_run
/// use scrawl::prelude::*;
///
/// # async fn boot() -> Result<(), ScrawlError> {
/// let server = ScrawlServer::builder()
///     .bind("0.0.0.0:8080")
///     .topic_source(StaticTopics::new(["A cat doing taxes"]))
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct ScrawlServerBuilder<T = StaticTopics> {
    bind_addr: String,
    room_config: RoomConfig,
    topics: T,
}

impl ScrawlServerBuilder {
    /// Creates a builder with default settings and the built-in topic list.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            room_config: RoomConfig::default(),
            topics: StaticTopics::default(),
        }
    }
}

impl Default for ScrawlServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TopicSource> ScrawlServerBuilder<T> {
    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the room configuration.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Sets where round prompts come from when the host doesn't supply one.
    pub fn topic_source<U: TopicSource>(self, topics: U) -> ScrawlServerBuilder<U> {
        ScrawlServerBuilder {
            bind_addr: self.bind_addr,
            room_config: self.room_config,
            topics,
        }
    }

    /// Binds the listener and creates the room.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`.
    pub async fn build(self) -> Result<ScrawlServer<T, JsonCodec>, ScrawlError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            room: RoomService::new(self.room_config),
            topics: self.topics,
            codec: JsonCodec,
        });

        Ok(ScrawlServer { transport, state })
    }
}

/// A Scrawl server hosting one room.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct ScrawlServer<T: TopicSource, C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<T, C>>,
}

impl ScrawlServer<StaticTopics, JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> ScrawlServerBuilder {
        ScrawlServerBuilder::new()
    }
}

impl<T, C> ScrawlServer<T, C>
where
    T: TopicSource,
    C: Codec,
{
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// A handle to the hosted room, shared with every connection.
    pub fn room(&self) -> RoomService {
        self.state.room.clone()
    }

    /// Runs the server accept loop.
    ///
    /// Each accepted connection gets its own task. Runs until the process
    /// is terminated.
    pub async fn run(mut self) -> Result<(), ScrawlError> {
        let room_code = self.state.room.room_code().await;
        tracing::info!(%room_code, "Scrawl server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
