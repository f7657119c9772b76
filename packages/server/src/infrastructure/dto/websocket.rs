//! WebSocket message DTOs.

use serde::{Deserialize, Serialize};

/// Request record sent by a client as one JSON text frame.
///
/// Unknown fields are ignored so older clients that send extra fields keep working.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InboundRequestDto {
    pub r#type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default)]
    pub content: String,
}

/// Record delivered to one recipient as one JSON text frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutboundMessageDto {
    pub r#type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// RFC 3339 (UTC, milliseconds)
    pub timestamp: String,
}
