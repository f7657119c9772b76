//! Real-time message router server.
//!
//! Clients connect with `ws://<host>:<port>/ws?name=<display name>` and exchange
//! broadcast, group and direct messages.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3000 --send-timeout-ms 2000
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use hiroba_server::{
    domain::{ChatState, ClientIdFactory},
    infrastructure::repository::InMemoryChatRepository,
    ui::{Server, ServerConfig},
    usecase::{
        ConnectClientUseCase, DisconnectClientUseCase, DispatchMessageUseCase, FanOut,
        GetAnalyticsUseCase, GetGroupsUseCase, GetUsersUseCase,
    },
};
use hiroba_shared::{logger::setup_logger, time::SystemClock};
use tokio::sync::Mutex;

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "Real-time message router with broadcast, group and direct delivery", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Capacity of each connection's outbound queue
    #[arg(long, default_value = "64")]
    outbound_buffer: usize,

    /// Per-recipient delivery timeout in milliseconds
    #[arg(long, default_value = "5000")]
    send_timeout_ms: u64,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            outbound_buffer: args.outbound_buffer,
            send_timeout: Duration::from_millis(args.send_timeout_ms),
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let config = ServerConfig::from(Args::parse());

    // Initialize dependencies in order:
    // 1. Repository
    // 2. UseCases
    // 3. Server

    // 1. Create Repository (in-memory state)
    let repository = Arc::new(InMemoryChatRepository::new(Arc::new(Mutex::new(
        ChatState::new(),
    ))));
    let clock = Arc::new(SystemClock);

    // 2. Create UseCases
    let connect_client_usecase = Arc::new(ConnectClientUseCase::new(
        repository.clone(),
        Arc::new(ClientIdFactory::new()),
        clock.clone(),
    ));
    let disconnect_client_usecase = Arc::new(DisconnectClientUseCase::new(repository.clone()));
    let dispatch_message_usecase = Arc::new(DispatchMessageUseCase::new(
        repository.clone(),
        clock,
        FanOut::new(config.send_timeout),
    ));
    let get_analytics_usecase = Arc::new(GetAnalyticsUseCase::new(repository.clone()));
    let get_groups_usecase = Arc::new(GetGroupsUseCase::new(repository.clone()));
    let get_users_usecase = Arc::new(GetUsersUseCase::new(repository));

    // 3. Create and run the server
    let server = Server::new(
        config,
        connect_client_usecase,
        disconnect_client_usecase,
        dispatch_message_usecase,
        get_analytics_usecase,
        get_groups_usecase,
        get_users_usecase,
    );
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
