//! UseCase: グループ一覧の取得

use std::sync::Arc;

use crate::domain::{ChatRepository, Group};

pub struct GetGroupsUseCase {
    repository: Arc<dyn ChatRepository>,
}

impl GetGroupsUseCase {
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self { repository }
    }

    /// 全グループとそのメンバー（グループ ID の辞書順）
    pub async fn execute(&self) -> Vec<Group> {
        self.repository.groups().await
    }
}
