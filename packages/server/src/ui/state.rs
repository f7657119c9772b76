//! Shared application state.

use std::sync::Arc;

use crate::usecase::{
    ConnectClientUseCase, DisconnectClientUseCase, DispatchMessageUseCase, GetAnalyticsUseCase,
    GetGroupsUseCase, GetUsersUseCase,
};

/// Shared application state
pub struct AppState {
    /// ConnectClientUseCase（クライアント接続のユースケース）
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    /// DisconnectClientUseCase（クライアント切断のユースケース）
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// DispatchMessageUseCase（メッセージルーティングのユースケース）
    pub dispatch_message_usecase: Arc<DispatchMessageUseCase>,
    pub get_analytics_usecase: Arc<GetAnalyticsUseCase>,
    pub get_groups_usecase: Arc<GetGroupsUseCase>,
    pub get_users_usecase: Arc<GetUsersUseCase>,
    /// 接続ごとの送信キューの容量
    pub outbound_buffer: usize,
}
