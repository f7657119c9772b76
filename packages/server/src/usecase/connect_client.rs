//! UseCase: クライアント接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectClientUseCase::execute() メソッド
//! - ID の採番、レジストリへの登録、接続通知の送信
//!
//! ### なぜこのテストが必要か
//! - 同時に接続したクライアントに異なる ID が割り当てられることを保証
//! - 接続通知が他のどのメッセージよりも先に届くことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規クライアントの接続
//! - 異常系：採番した ID が既に登録されている（不変条件違反）

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    ChatRepository, ClientIdFactory, ClientRecord, DisplayName, Identity, MessageKind,
    OutboundMessage, RegistryError, SharedConnection, Timestamp,
};

use super::error::ConnectError;

/// クライアント接続のユースケース
pub struct ConnectClientUseCase {
    repository: Arc<dyn ChatRepository>,
    id_factory: Arc<ClientIdFactory>,
    clock: Arc<dyn Clock>,
}

impl ConnectClientUseCase {
    pub fn new(
        repository: Arc<dyn ChatRepository>,
        id_factory: Arc<ClientIdFactory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            id_factory,
            clock,
        }
    }

    /// クライアント接続を実行
    ///
    /// 新しい ID を採番し、`connected` メッセージを接続ハンドルに積んでからレジストリに登録する。
    /// 登録後に届くメッセージは必ず `connected` の後に並ぶ。
    ///
    /// # Returns
    ///
    /// * `Ok(ClientRecord)` - 登録されたクライアント
    /// * `Err(ConnectError)` - 登録失敗（接続は拒否される）
    pub async fn execute(
        &self,
        name: DisplayName,
        handle: SharedConnection,
    ) -> Result<ClientRecord, ConnectError> {
        let identity = Identity::new(self.id_factory.generate(), name);
        let connected_at = Timestamp::new(self.clock.now_millis());

        let welcome = OutboundMessage::routed(
            MessageKind::Connected,
            identity.clone(),
            None,
            format!(
                "Welcome, {}! Your ID is {}.",
                identity.name.as_str(),
                identity.id.as_str()
            ),
            connected_at,
        );
        if let Err(e) = handle.send(welcome).await {
            tracing::warn!("Failed to send welcome message to '{}': {}", identity, e);
        }

        let record = self
            .repository
            .register(identity, handle, connected_at)
            .await
            .map_err(|e| match e {
                RegistryError::DuplicateIdentity(id) => {
                    tracing::error!("Refusing connection: client ID '{}' is already live", id);
                    ConnectError::DuplicateIdentity(id)
                }
                other => ConnectError::Registry(other),
            })?;

        tracing::info!(
            "Client connected: {} (active: {})",
            record.identity,
            self.repository.count().await
        );
        Ok(record)
    }
}
