//! 接続ハンドル（メッセージ送信口）の実装
//!
//! ## 実装
//!
//! - `websocket`: WebSocket 接続ごとの有界チャンネルを使った実装

pub mod websocket;

pub use websocket::WebSocketConnection;
