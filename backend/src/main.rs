//! Wheat Receiving Tracker - Backend Server
//!
//! Tracks received wheat volume per cultivar against its forecast and serves
//! the records, the daily receiving timeline and aggregated views as JSON.

use axum::{routing::get, Router};
use std::{net::SocketAddr, sync::Arc};
use tokio::sync::Mutex;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod handlers;
mod routes;
mod services;
mod store;

pub use config::Config;

use services::TimelineService;
use store::{CsvRowStore, RecordStore, RowStore, TimelineStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub records: Arc<dyn RowStore>,
    pub timeline: Arc<dyn RowStore>,
    /// Held by every handler that writes to a store
    pub write_gate: Arc<Mutex<()>>,
}

impl AppState {
    /// State backed by the CSV files named in the configuration
    pub fn new(config: Config) -> Self {
        let records = CsvRowStore::new(config.storage.data_file.clone());
        let timeline = CsvRowStore::new(config.storage.timeline_file.clone());
        Self {
            config: Arc::new(config),
            records: Arc::new(records),
            timeline: Arc::new(timeline),
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    pub fn record_store(&self) -> RecordStore {
        RecordStore::new(self.records.clone())
    }

    pub fn timeline_service(&self) -> TimelineService {
        TimelineService::new(
            TimelineStore::new(self.timeline.clone()),
            self.record_store(),
            self.config.timeline.clone(),
        )
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wrt_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Wheat Receiving Tracker Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!(
        "Records: {}, timeline: {}",
        config.storage.data_file.display(),
        config.storage.timeline_file.display()
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    // Create application state
    let state = AppState::new(config);

    // Make sure both stores exist with their canonical headers
    let records = state.record_store().load();
    tracing::info!("Loaded {} cultivar records", records.len());

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Wheat Receiving Tracker API v1.0"
}
