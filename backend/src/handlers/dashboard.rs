//! Dashboard settings handler

use axum::{extract::State, Json};

use crate::config::DashboardConfig;
use crate::AppState;

/// Read-only dashboard title, theme and labels
pub async fn get_dashboard_config(State(state): State<AppState>) -> Json<DashboardConfig> {
    Json(state.config.dashboard.clone())
}
