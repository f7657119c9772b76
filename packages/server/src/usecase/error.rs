//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::RegistryError;

/// 接続処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// 採番した ID が既に登録されていた（不変条件違反）
    #[error("Client ID '{0}' collided with a live client")]
    DuplicateIdentity(String),

    #[error(transparent)]
    Registry(RegistryError),
}
