//! Route definitions for the Wheat Receiving Tracker

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Cultivar records
        .nest("/records", record_routes())
        // Daily receiving timeline
        .nest("/timeline", timeline_routes())
        // Aggregated views (?format=csv for export)
        .route("/aggregations/:kind", get(handlers::get_aggregation))
        // Dashboard settings (read-only)
        .route("/config", get(handlers::get_dashboard_config))
}

/// Cultivar record routes
fn record_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_records)
                .put(handlers::update_records)
                .post(handlers::register_record),
        )
        .route("/import", post(handlers::import_records))
}

/// Timeline routes
fn timeline_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_timeline))
        .route("/import", post(handlers::import_timeline))
}
