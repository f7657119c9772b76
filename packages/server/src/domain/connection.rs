//! 接続ハンドル（クライアントごとの送信口）のインターフェース
//!
//! ルーティングの中核はトランスポートを知りません。配送先として解決されたクライアントに対して
//! `ConnectionHandle::send` を呼ぶだけで、実際の書き込みは Infrastructure 層の実装が担います。

use std::sync::Arc;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::{error::PushError, message::OutboundMessage};

/// クライアント 1 接続分の送信口
///
/// 送信は配送に成功するか失敗するかのどちらかで、失敗は受信者ごとに閉じる。
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ConnectionHandle: Send + Sync {
    /// メッセージを 1 件送信する
    async fn send(&self, message: OutboundMessage) -> Result<(), PushError>;
}

/// レジストリと配送処理の間で共有される接続ハンドル
pub type SharedConnection = Arc<dyn ConnectionHandle>;
