//! ドメイン層のエラー型

use thiserror::Error;

/// Value Object の生成時のバリデーションエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("Client ID must not be empty")]
    ClientIdEmpty,

    #[error("Client ID '{0}' must consist of ASCII digits")]
    ClientIdNotNumeric(String),

    #[error("Display name must not be empty")]
    DisplayNameEmpty,

    #[error("Display name is too long ({actual} > {max} characters)")]
    DisplayNameTooLong { max: usize, actual: usize },

    #[error("Group ID must not be empty")]
    GroupIdEmpty,

    #[error("Group ID is too long ({actual} > {max} characters)")]
    GroupIdTooLong { max: usize, actual: usize },

    #[error("Message content is too long ({actual} > {max} bytes)")]
    MessageContentTooLong { max: usize, actual: usize },
}

/// クライアントレジストリ・グループ管理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// ID の衝突。ID はサーバーが採番するため、発生した場合は不変条件違反
    #[error("Client ID '{0}' is already registered")]
    DuplicateIdentity(String),

    #[error("User '{0}' not found")]
    UserNotFound(String),

    #[error("Group '{0}' does not exist")]
    GroupNotFound(String),
}

/// 接続ハンドルへの送信エラー（受信者ごとに発生し、送信者には伝播しない）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PushError {
    #[error("Connection closed: {0}")]
    Closed(String),

    /// 送信キューが満杯（受信者が読み出していない）
    #[error("Outbound queue is full ({0} pending)")]
    QueueFull(usize),

    #[error("Send timed out after {0} ms")]
    Timeout(u64),
}

/// 受信したリクエストの分類エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Unknown request type '{0}'")]
    UnknownType(String),

    #[error("Request type '{0}' requires a target")]
    MissingTarget(String),

    #[error("Invalid request: {0}")]
    InvalidValue(#[from] ValueObjectError),
}
