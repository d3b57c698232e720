use scrawl::prelude::*;
use tracing_subscriber::EnvFilter;

const DEFAULT_BIND: &str = "0.0.0.0:8080";

fn bind_addr() -> String {
    std::env::var("SCRAWL_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string())
}

async fn build_server(addr: &str) -> Result<ScrawlServer<StaticTopics, JsonCodec>, ScrawlError> {
    ScrawlServer::builder()
        .bind(addr)
        .room_config(RoomConfig::default())
        .topic_source(StaticTopics::default())
        .build()
        .await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("scrawl=debug,scrawl_room=debug")),
        )
        .init();

    let addr = bind_addr();
    let server = build_server(&addr).await?;
    let room_code = server.room().room_code().await;
    tracing::info!(%addr, %room_code, "party server up, phones can join now");

    server.run().await?;
    Ok(())
}
