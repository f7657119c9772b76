//! UI layer
//!
//! WebSocket / HTTP の入出力を UseCase につなぎます。

mod config;
mod handler;
mod server;
mod signal;
mod state;

pub use config::ServerConfig;
pub use server::Server;
pub use state::AppState;
