//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    domain::AnalyticsSnapshot,
    infrastructure::dto::http::{GroupSummaryDto, UserSummaryDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get usage analytics
pub async fn get_analytics(State(state): State<Arc<AppState>>) -> Json<AnalyticsSnapshot> {
    Json(state.get_analytics_usecase.execute().await)
}

/// Get list of groups with their members
pub async fn get_groups(State(state): State<Arc<AppState>>) -> Json<Vec<GroupSummaryDto>> {
    let groups = state.get_groups_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(groups.iter().map(GroupSummaryDto::from).collect())
}

/// Get list of connected users
pub async fn get_users(State(state): State<Arc<AppState>>) -> Json<Vec<UserSummaryDto>> {
    let users = state.get_users_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(users.iter().map(UserSummaryDto::from).collect())
}
