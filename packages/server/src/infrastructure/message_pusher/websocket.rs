//! WebSocket を使った ConnectionHandle 実装
//!
//! ## 責務
//!
//! - クライアントごとの有界チャンネル（`mpsc::Sender`）を保持する
//! - `send` はメッセージをチャンネルに積むだけで、ソケットへの書き込みは UI 層の送信タスクが行う
//!
//! ## 設計ノート
//!
//! `send` は `try_send` で積むだけで待ちません。受信側が読み出さずにキューが満杯になった
//! 接続へのメッセージは `PushError::QueueFull` として捨て、その受信者の配送失敗として扱います。
//! 1 人の遅い受信者が送信者や他の受信者を待たせることはありません。

use async_trait::async_trait;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::domain::{ConnectionHandle, OutboundMessage, PushError};

/// WebSocket 接続 1 本分の送信口
#[derive(Debug, Clone)]
pub struct WebSocketConnection {
    sender: mpsc::Sender<OutboundMessage>,
}

impl WebSocketConnection {
    pub fn new(sender: mpsc::Sender<OutboundMessage>) -> Self {
        Self { sender }
    }

    /// 指定した容量のチャンネルを作り、送信口と受信側を返す
    ///
    /// 容量 0 は 1 として扱う。
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<OutboundMessage>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self::new(sender), receiver)
    }
}

#[async_trait]
impl ConnectionHandle for WebSocketConnection {
    async fn send(&self, message: OutboundMessage) -> Result<(), PushError> {
        match self.sender.try_send(message) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                Err(PushError::QueueFull(self.sender.max_capacity()))
            }
            Err(TrySendError::Closed(_)) => {
                Err(PushError::Closed("receiver dropped".to_string()))
            }
        }
    }
}
