//! UseCase: 集計値の取得

use std::sync::Arc;

use crate::domain::{AnalyticsSnapshot, ChatRepository};

pub struct GetAnalyticsUseCase {
    repository: Arc<dyn ChatRepository>,
}

impl GetAnalyticsUseCase {
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self { repository }
    }

    /// 4 つの集計値を 1 回のロックで取得する
    pub async fn execute(&self) -> AnalyticsSnapshot {
        self.repository.snapshot().await
    }
}
