//! Integration tests for the WebSocket transport.
//!
//! These spin up a real listener on an OS-assigned port and talk to it,
//! both with a raw `tokio-tungstenite` client and with [`connect`].

#[cfg(feature = "websocket")]
mod websocket {
    use futures_util::{SinkExt, StreamExt};
    use scrawl_transport::{connect, Connection, Transport, WebSocketTransport};
    use tokio_tungstenite::tungstenite::Message;

    async fn bind() -> (WebSocketTransport, String) {
        let transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("should have addr").to_string();
        (transport, addr)
    }

    #[tokio::test]
    async fn test_websocket_accept_and_send_receive() {
        let (mut transport, addr) = bind().await;

        let server_handle = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });

        let (mut client_ws, _) =
            tokio_tungstenite::connect_async(format!("ws://{addr}"))
                .await
                .expect("client should connect");
        let server_conn = server_handle.await.expect("task should complete");

        assert!(server_conn.id().into_inner() > 0);

        // Server → client: UTF-8 payloads go out as text frames.
        server_conn.send(br#"{"hello":1}"#).await.unwrap();
        let msg = client_ws.next().await.unwrap().unwrap();
        assert!(msg.is_text());
        assert_eq!(msg.into_data().as_ref(), br#"{"hello":1}"#);

        // Client → server, binary frame.
        client_ws
            .send(Message::binary(b"from phone".to_vec()))
            .await
            .unwrap();
        let received = server_conn.recv().await.unwrap().unwrap();
        assert_eq!(received, b"from phone");

        server_conn.close().await.expect("close should succeed");
    }

    #[tokio::test]
    async fn test_websocket_recv_returns_none_on_client_close() {
        let (mut transport, addr) = bind().await;

        let server_handle = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });

        let (mut client_ws, _) =
            tokio_tungstenite::connect_async(format!("ws://{addr}"))
                .await
                .unwrap();
        let server_conn = server_handle.await.unwrap();

        client_ws.send(Message::Close(None)).await.unwrap();

        let result = server_conn.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on client close");
    }

    #[tokio::test]
    async fn test_client_connect_talks_to_transport() {
        let (mut transport, addr) = bind().await;

        let server_handle = tokio::spawn(async move {
            let conn = transport.accept().await.expect("should accept");
            let data = conn.recv().await.unwrap().unwrap();
            conn.send(&data).await.unwrap();
            conn
        });

        let client = connect(&format!("ws://{addr}")).await.unwrap();
        client.send(b"echo me").await.unwrap();
        let echoed = client.recv().await.unwrap().unwrap();
        assert_eq!(echoed, b"echo me");

        let _server_conn = server_handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_connect_to_closed_port_fails() {
        let (transport, addr) = bind().await;
        drop(transport);

        let result = connect(&format!("ws://{addr}")).await;
        assert!(result.is_err());
    }
}
