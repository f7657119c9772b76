//! WebSocket connection handlers.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{DisplayName, InboundRequest, OutboundMessage},
    infrastructure::{
        dto::websocket::{InboundRequestDto, OutboundMessageDto},
        message_pusher::WebSocketConnection,
    },
    ui::state::AppState,
    usecase::DispatchOutcome,
};

/// セッション終了時、送信キューに残った応答を書き出すまで待つ上限
const FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub name: String,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    // Convert String -> DisplayName (Domain Model)
    let name = match DisplayName::new(query.name) {
        Ok(name) => name,
        Err(e) => {
            tracing::warn!("Rejecting connection: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    // 登録は upgrade 後に行う（upgrade に失敗しても登録が残らない）
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, name)))
}

/// Spawns a task that drains the connection's outbound queue into the WebSocket sender.
///
/// キューの送信口が全て破棄されると、残りを書き出した後に Close フレームを送って終わる。
fn pusher_loop(
    mut rx: mpsc::Receiver<OutboundMessage>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            // Domain Model から DTO への変換
            let json = match serde_json::to_string(&OutboundMessageDto::from(message)) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize outbound message: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                return;
            }
        }
        if let Err(e) = sender.send(Message::Close(None)).await {
            tracing::debug!("Failed to send close frame: {}", e);
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, name: DisplayName) {
    let (connection, rx) = WebSocketConnection::channel(state.outbound_buffer);

    let client = match state
        .connect_client_usecase
        .execute(name, Arc::new(connection))
        .await
    {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Connection refused: {}", e);
            return;
        }
    };

    let (sender, mut receiver) = socket.split();

    let client_id = client.id().clone();
    let state_clone = state.clone();

    // Spawn a task to receive requests from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket read error from {}: {}", client.identity, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let request = match serde_json::from_str::<InboundRequestDto>(&text) {
                        Ok(dto) => InboundRequest::from(dto),
                        Err(e) => {
                            tracing::warn!(
                                "Dropping malformed frame from {}: {}",
                                client.identity,
                                e
                            );
                            continue;
                        }
                    };

                    // 1 件ずつ処理し終えてから次を読む（接続ごとの順序を保つ）
                    let outcome = state_clone
                        .dispatch_message_usecase
                        .execute(&client, request)
                        .await;
                    if outcome == DispatchOutcome::Exit {
                        break;
                    }
                }
                Message::Close(_) => {
                    tracing::info!("{} requested close", client.identity);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to push queued messages to this client
    let mut send_task = pusher_loop(rx, sender);

    tokio::select! {
        _ = &mut recv_task => {
            // 登録を外すと送信口が全て破棄され、送信タスクはキューを流し切って終わる
            state.disconnect_client_usecase.execute(&client_id).await;
            if tokio::time::timeout(FLUSH_TIMEOUT, &mut send_task).await.is_err() {
                tracing::warn!("Timed out flushing outbound queue of client '{}'", client_id);
                send_task.abort();
            }
        }
        _ = &mut send_task => {
            recv_task.abort();
            state.disconnect_client_usecase.execute(&client_id).await;
        }
    };
}
