//! Leaf Hub Server
//!
//! Receives leaf photos from the sensor hub and serves back a diagnosis.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       LEAF HUB SERVER                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  POST /upload ─► ImageStore ─► AnalysisPipeline ─► Cache     │
//! │                                 │                  │         │
//! │                 ┌───────────────┴──────────┐       ▼         │
//! │                 │ Heuristic │ ONNX model   │   GET /result   │
//! │                 │ (always)  │ (if loaded)  │                 │
//! │                 └───────────┴──────────────┘                 │
//! │                          │                                   │
//! │                          └──► ResultForwarder (optional)     │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod forward;
mod handlers;
mod logic;
mod models;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

use forward::ResultForwarder;
use logic::AnalysisPipeline;
use storage::ImageStore;

/// Largest accepted upload.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging (JSON lines in production)
    let registry = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "leafhub_server=debug,tower_http=debug".into()));
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Leaf Hub Server starting ({})...", config.environment);

    let store = ImageStore::open(&config.upload_dir)
        .await
        .with_context(|| format!("failed to create {}", config.upload_dir.display()))?;

    let sources = config.pipeline_sources();
    let pipeline = tokio::task::spawn_blocking(move || AnalysisPipeline::initialize(&sources))
        .await
        .context("pipeline initialization panicked")?;

    let forwarder = ResultForwarder::new(config.forward_url.clone(), config.forward_timeout);

    // Build application state
    let state = AppState {
        pipeline: Arc::new(pipeline),
        store,
        forwarder,
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.bind_addr, config.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", config.bind_addr, config.port))?;
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<AnalysisPipeline>,
    pub store: ImageStore,
    pub forwarder: Option<ResultForwarder>,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/status", get(handlers::status::get))
        .route("/upload", post(handlers::upload::upload))
        .route("/result", get(handlers::result::latest))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
