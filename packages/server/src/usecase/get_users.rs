//! UseCase: 接続中クライアント一覧の取得

use std::sync::Arc;

use crate::domain::{ChatRepository, ClientRecord};

pub struct GetUsersUseCase {
    repository: Arc<dyn ChatRepository>,
}

impl GetUsersUseCase {
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self { repository }
    }

    /// 接続中のクライアント（ID 順）
    pub async fn execute(&self) -> Vec<ClientRecord> {
        let mut clients = self.repository.all_clients().await;
        clients.sort_by(|a, b| a.id().cmp(b.id()));
        clients
    }
}
