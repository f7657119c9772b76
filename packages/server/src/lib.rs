//! Real-time message router library.
//!
//! Clients connect over WebSocket, receive a server-assigned identity, and exchange
//! broadcast, group and direct messages. Group membership and usage analytics are
//! kept in memory for the lifetime of the process.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
