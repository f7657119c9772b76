//! In-process test server and WebSocket test client.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use hiroba_server::{
    domain::{ChatState, ClientIdFactory},
    infrastructure::repository::InMemoryChatRepository,
    ui::{Server, ServerConfig},
    usecase::{
        ConnectClientUseCase, DisconnectClientUseCase, DispatchMessageUseCase, FanOut,
        GetAnalyticsUseCase, GetGroupsUseCase, GetUsersUseCase,
    },
};
use hiroba_shared::time::SystemClock;
use serde_json::Value;
use tokio::{
    net::{TcpListener, TcpStream},
    sync::{Mutex, oneshot},
    task::JoinHandle,
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// Helper struct to manage an in-process server on an ephemeral port
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(ServerConfig {
            port: 0,
            ..ServerConfig::default()
        })
        .await
    }

    pub async fn start_with(config: ServerConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let repository = Arc::new(InMemoryChatRepository::new(Arc::new(Mutex::new(
            ChatState::new(),
        ))));
        let clock = Arc::new(SystemClock);
        let server = Server::new(
            config.clone(),
            Arc::new(ConnectClientUseCase::new(
                repository.clone(),
                Arc::new(ClientIdFactory::new()),
                clock.clone(),
            )),
            Arc::new(DisconnectClientUseCase::new(repository.clone())),
            Arc::new(DispatchMessageUseCase::new(
                repository.clone(),
                clock,
                FanOut::new(config.send_timeout),
            )),
            Arc::new(GetAnalyticsUseCase::new(repository.clone())),
            Arc::new(GetGroupsUseCase::new(repository.clone())),
            Arc::new(GetUsersUseCase::new(repository)),
        );

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let shutdown = async {
                let _ = shutdown_rx.await;
            };
            let _ = server.serve(listener, shutdown).await;
        });

        Self {
            addr,
            shutdown: Some(shutdown_tx),
            handle,
        }
    }

    /// Get the WebSocket URL for this server
    pub fn ws_url(&self, name: &str) -> String {
        format!("ws://{}/ws?name={}", self.addr, name)
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get_json(&self, path: &str) -> Value {
        reqwest::get(self.http_url(path))
            .await
            .unwrap()
            .json::<Value>()
            .await
            .unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        self.handle.abort();
    }
}

/// Helper struct wrapping a WebSocket client connection
pub struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    pub id: String,
    pub name: String,
}

impl TestClient {
    /// Connect and consume the `connected` handshake
    pub async fn connect(server: &TestServer, name: &str) -> Self {
        let (stream, _) = connect_async(server.ws_url(name)).await.unwrap();
        let mut client = Self {
            stream,
            id: String::new(),
            name: name.to_string(),
        };

        let welcome = client.recv().await;
        assert_eq!(welcome["type"], "connected");
        assert_eq!(welcome["sender_name"], name);
        client.id = welcome["sender_id"].as_str().unwrap().to_string();
        client
    }

    pub async fn send(&mut self, request: Value) {
        self.send_raw(&request.to_string()).await;
    }

    pub async fn send_raw(&mut self, text: &str) {
        self.stream
            .send(Message::Text(text.to_string().into()))
            .await
            .unwrap();
    }

    /// Receive the next JSON record, failing after a timeout
    pub async fn recv(&mut self) -> Value {
        loop {
            let frame = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .expect("timed out waiting for a message")
                .expect("connection closed")
                .unwrap();
            if let Message::Text(text) = frame {
                return serde_json::from_str(&text).unwrap();
            }
        }
    }

    /// Assert that no record arrives within a short window
    pub async fn expect_silence(&mut self) {
        let result = tokio::time::timeout(Duration::from_millis(200), self.stream.next()).await;
        if let Ok(Some(Ok(Message::Text(text)))) = result {
            panic!("unexpected message for {}: {}", self.name, text);
        }
    }

    /// Wait until the server closes the connection
    pub async fn expect_closed(&mut self) {
        loop {
            let frame = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .expect("timed out waiting for the connection to close");
            match frame {
                None | Some(Err(_)) | Some(Ok(Message::Close(_))) => return,
                Some(Ok(_)) => continue,
            }
        }
    }

    /// Assert that the next frame is a Close frame sent by the server
    pub async fn expect_close_frame(&mut self) {
        let frame = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
            .await
            .expect("timed out waiting for the close frame");
        match frame {
            Some(Ok(Message::Close(_))) => {}
            other => panic!("expected a close frame for {}, got {:?}", self.name, other),
        }
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}
