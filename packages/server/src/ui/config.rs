//! Server configuration.

use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// The host address to bind to
    pub host: String,
    /// The port number to bind to
    pub port: u16,
    /// 接続ごとの送信キューの容量
    pub outbound_buffer: usize,
    /// 受信者 1 人あたりの配送タイムアウト
    pub send_timeout: Duration,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            outbound_buffer: 64,
            send_timeout: Duration::from_millis(5000),
        }
    }
}
