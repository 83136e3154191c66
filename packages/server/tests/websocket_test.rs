//! End-to-end tests: real WebSocket clients against a server on an ephemeral port.

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use futures_util::{SinkExt, StreamExt};
use rest_websockets_server::{
    config::ServerConfig,
    hub::{ConnectionId, HubHandle, InboundHandler},
    ui::{
        Server,
        dto::{ErrorResponse, HomeResponse, HubStatsResponse, PublishEventResponse},
    },
};
use serde_json::{Value, json};
use tokio::{net::TcpListener, sync::oneshot};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

type Client = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

const TIMEOUT: Duration = Duration::from_secs(5);

/// Helper struct to manage the server lifecycle
struct TestServer {
    addr: SocketAddr,
    hub: HubHandle,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    async fn start() -> Self {
        Self::start_with(None).await
    }

    async fn start_with(inbound: Option<Arc<dyn InboundHandler>>) -> Self {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            jwt_secret: "secret".to_string(),
            database_url: "postgres://localhost/test".to_string(),
            outbound_buffer: 16,
        };
        let mut server = Server::new(config).expect("valid config");
        if let Some(inbound) = inbound {
            server = server.with_inbound_handler(inbound);
        }
        let hub = server.hub();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            server
                .serve(listener, async {
                    let _ = rx.await;
                })
                .await
                .expect("server failed");
        });

        Self {
            addr,
            hub,
            shutdown: Some(tx),
        }
    }

    fn http(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn connect(&self) -> Client {
        let (ws, _response) = connect_async(format!("ws://{}/ws", self.addr))
            .await
            .expect("Failed to connect");
        ws
    }

    /// Wait until the hub reports `expected` connections
    async fn wait_for_connections(&self, expected: usize) {
        tokio::time::timeout(TIMEOUT, async {
            while self.hub.connection_count().await != expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("hub never reached {expected} connections"));
    }

    async fn publish(&self, body: Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(self.http("/api/events"))
            .json(&body)
            .send()
            .await
            .expect("request failed")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

async fn next_json(client: &mut Client) -> Value {
    loop {
        let frame = tokio::time::timeout(TIMEOUT, client.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("stream ended")
            .expect("websocket error");
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).expect("frame is JSON");
        }
    }
}

#[tokio::test]
async fn test_home_and_health() {
    // テスト項目: ホームとヘルスチェックのエンドポイントが応答する
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let home: HomeResponse = reqwest::get(server.http("/"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let health: Value = reqwest::get(server.http("/api/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert!(home.status);
    assert_eq!(health, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_published_event_reaches_every_client() {
    // テスト項目: 公開したイベントが接続中の全クライアントに届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;
    let mut bob = server.connect().await;
    server.wait_for_connections(2).await;

    // when (操作):
    let response = server
        .publish(json!({"type": "post_created", "payload": {"id": 1, "content": "hello"}}))
        .await;

    // then (期待する結果):
    assert_eq!(response.status(), reqwest::StatusCode::ACCEPTED);
    let receipt: PublishEventResponse = response.json().await.unwrap();
    assert_eq!(receipt.listeners, 2);

    for client in [&mut alice, &mut bob] {
        let event = next_json(client).await;
        assert_eq!(event["type"], "post_created");
        assert_eq!(event["payload"], json!({"id": 1, "content": "hello"}));
        assert!(event["published_at"].as_i64().unwrap() > 0);
    }
}

#[tokio::test]
async fn test_events_arrive_in_publish_order() {
    // テスト項目: 同じクライアントには公開した順序でイベントが届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;
    server.wait_for_connections(1).await;

    // when (操作):
    for i in 1..=3 {
        let response = server
            .publish(json!({"type": "post_created", "payload": {"id": i}}))
            .await;
        assert_eq!(response.status(), reqwest::StatusCode::ACCEPTED);
    }

    // then (期待する結果):
    for i in 1..=3 {
        assert_eq!(next_json(&mut alice).await["payload"]["id"], i);
    }
}

#[tokio::test]
async fn test_closed_client_is_unregistered() {
    // テスト項目: クライアントが切断するとハブから解除され、残りのクライアントには届き続ける
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;
    let mut bob = server.connect().await;
    server.wait_for_connections(2).await;

    // when (操作):
    alice.close(None).await.unwrap();
    server.wait_for_connections(1).await;
    server
        .publish(json!({"type": "post_deleted", "payload": {"id": 3}}))
        .await;

    // then (期待する結果):
    let stats: HubStatsResponse = reqwest::get(server.http("/api/hub"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats.connections, 1);
    assert_eq!(next_json(&mut bob).await["type"], "post_deleted");
}

#[tokio::test]
async fn test_dropped_client_is_unregistered() {
    // テスト項目: close フレームなしに TCP が切れてもハブから解除される
    // given (前提条件):
    let server = TestServer::start().await;
    let alice = server.connect().await;
    server.wait_for_connections(1).await;

    // when (操作):
    drop(alice);

    // then (期待する結果):
    server.wait_for_connections(0).await;
}

#[tokio::test]
async fn test_invalid_event_type_is_rejected() {
    // テスト項目: 空の event type は 400 で拒否され、クライアントには何も届かない
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let response = server.publish(json!({"type": "   ", "payload": {}})).await;

    // then (期待する結果):
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json().await.unwrap();
    assert!(body.error.contains("event type"));
}

#[tokio::test]
async fn test_unreadable_body_gets_error_shape() {
    // テスト項目: type が無い・JSON として壊れているリクエストも 400 と error フィールドで返る
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let missing_type = server.publish(json!({"payload": {"id": 1}})).await;
    let malformed = client
        .post(server.http("/api/events"))
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    for response in [missing_type, malformed] {
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json().await.unwrap();
        assert!(!body.error.is_empty());
    }
}

/// Records every inbound text frame.
#[derive(Default)]
struct RecordingInbound {
    received: Mutex<Vec<(ConnectionId, String)>>,
}

impl InboundHandler for RecordingInbound {
    fn on_text(&self, id: ConnectionId, text: &str) {
        self.received.lock().unwrap().push((id, text.to_string()));
    }
}

#[tokio::test]
async fn test_inbound_text_reaches_injected_handler() {
    // テスト項目: クライアントから送られたテキストが注入したハンドラに届く
    // given (前提条件):
    let inbound = Arc::new(RecordingInbound::default());
    let server = TestServer::start_with(Some(inbound.clone())).await;
    let mut alice = server.connect().await;
    server.wait_for_connections(1).await;

    // when (操作):
    alice.send(Message::text("hello hub")).await.unwrap();

    // then (期待する結果):
    tokio::time::timeout(TIMEOUT, async {
        while inbound.received.lock().unwrap().is_empty() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("handler never called");
    let received = inbound.received.lock().unwrap().clone();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].0, server.hub.members().await[0]);
    assert_eq!(received[0].1, "hello hub");
}
