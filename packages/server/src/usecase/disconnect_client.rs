//! UseCase: クライアント切断処理
//!
//! レジストリからの削除と全グループからの除名は、リポジトリの 1 回の操作で行われる。
//! 何度呼ばれても安全（2 回目以降は何もしない）。

use std::sync::Arc;

use crate::domain::{ChatRepository, ClientId, ClientRecord};

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    repository: Arc<dyn ChatRepository>,
}

impl DisconnectClientUseCase {
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self { repository }
    }

    /// クライアント切断を実行
    ///
    /// # Returns
    ///
    /// 削除されたクライアント（既に削除済みの場合は `None`）
    pub async fn execute(&self, client_id: &ClientId) -> Option<ClientRecord> {
        let removed = self.repository.remove(client_id).await;
        match &removed {
            Some(record) => tracing::info!(
                "Client disconnected: {} (left {} group(s), active: {})",
                record.identity,
                record.groups.len(),
                self.repository.count().await
            ),
            None => tracing::debug!("Client '{}' was already removed", client_id),
        }
        removed
    }
}
