//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// A group and its current members
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupSummaryDto {
    pub id: String,
    pub members: Vec<String>,
}

/// A connected client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSummaryDto {
    pub id: String,
    pub name: String,
    /// RFC 3339 (UTC, milliseconds)
    pub connected_at: String,
    pub groups: Vec<String>,
}
