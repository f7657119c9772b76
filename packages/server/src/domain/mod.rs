//! Domain layer
//!
//! ルーティングの中核となるドメインモデル（クライアントレジストリ、グループ管理、集計カウンタ）と、
//! Infrastructure 層が実装するインターフェース（Repository, ConnectionHandle）を定義します。

pub mod connection;
pub mod entity;
pub mod error;
pub mod factory;
pub mod message;
pub mod repository;
pub mod state;
pub mod value_object;

pub use connection::{ConnectionHandle, SharedConnection};
pub use entity::{
    AnalyticsSnapshot, ClientRecord, Group, Identity, JoinOutcome, LeaveOutcome, Recipient,
};
pub use error::{PushError, RegistryError, RequestError, ValueObjectError};
pub use factory::ClientIdFactory;
pub use message::{InboundRequest, MessageKind, OutboundMessage, Request};
pub use repository::ChatRepository;
pub use state::ChatState;
pub use value_object::{ClientId, DisplayName, GroupId, MessageContent, Timestamp};

#[cfg(test)]
pub use connection::MockConnectionHandle;
