//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::usecase::{
    ConnectClientUseCase, DisconnectClientUseCase, DispatchMessageUseCase, GetAnalyticsUseCase,
    GetGroupsUseCase, GetUsersUseCase,
};

use super::{
    config::ServerConfig,
    handler::{get_analytics, get_groups, get_users, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Message router server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     config,
///     connect_client_usecase,
///     disconnect_client_usecase,
///     dispatch_message_usecase,
///     get_analytics_usecase,
///     get_groups_usecase,
///     get_users_usecase,
/// );
/// server.run().await?;
/// ```
pub struct Server {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        config: ServerConfig,
        connect_client_usecase: Arc<ConnectClientUseCase>,
        disconnect_client_usecase: Arc<DisconnectClientUseCase>,
        dispatch_message_usecase: Arc<DispatchMessageUseCase>,
        get_analytics_usecase: Arc<GetAnalyticsUseCase>,
        get_groups_usecase: Arc<GetGroupsUseCase>,
        get_users_usecase: Arc<GetUsersUseCase>,
    ) -> Self {
        let state = Arc::new(AppState {
            connect_client_usecase,
            disconnect_client_usecase,
            dispatch_message_usecase,
            get_analytics_usecase,
            get_groups_usecase,
            get_users_usecase,
            outbound_buffer: config.outbound_buffer,
        });
        Self { config, state }
    }

    /// WebSocket / HTTP のルーティング
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/analytics", get(get_analytics))
            .route("/api/groups", get(get_groups))
            .route("/api/users", get(get_users))
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server on the configured host and port until Ctrl+C / SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address or
    /// if there's an error during server execution.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = self.config.bind_addr();
        let listener = TcpListener::bind(&bind_addr).await?;
        tracing::info!("Connect to: ws://{}/ws?name=<display name>", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;
        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` completes
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        tracing::info!(
            "Message router listening on {} (outbound buffer: {}, send timeout: {:?})",
            listener.local_addr()?,
            self.config.outbound_buffer,
            self.config.send_timeout
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}
