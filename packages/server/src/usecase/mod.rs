//! UseCase layer
//!
//! 接続・切断・メッセージのルーティング・状態の参照を、ドメイン層のインターフェースだけを使って実装します。

mod connect_client;
mod disconnect_client;
mod dispatch_message;
mod error;
mod fan_out;
mod get_analytics;
mod get_groups;
mod get_users;

pub use connect_client::ConnectClientUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use dispatch_message::{DispatchMessageUseCase, DispatchOutcome};
pub use error::ConnectError;
pub use fan_out::{DeliveryReport, FanOut};
pub use get_analytics::GetAnalyticsUseCase;
pub use get_groups::GetGroupsUseCase;
pub use get_users::GetUsersUseCase;
