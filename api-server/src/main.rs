//! AeroRisk API Server
//!
//! Serves the trained fatal-accident classifier behind a small HTTP
//! surface.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      AERORISK API                        │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌──────────┐   ┌──────────────┐   ┌─────────────────┐  │
//! │  │  Router  │   │  Validation  │   │  Scorer         │  │
//! │  │  (Axum)  │──▶│  (validator) │──▶│  (aerorisk-core)│  │
//! │  └──────────┘   └──────────────┘   └────────┬────────┘  │
//! │                                             ▼           │
//! │                                   ┌──────────────────┐  │
//! │                                   │  ModelBundle     │  │
//! │                                   │  (read-only)     │  │
//! │                                   └──────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The artifact set is loaded exactly once at startup into an immutable
//! bundle. If loading fails the server still starts, reports itself
//! degraded on `/health` and answers 503 on the prediction endpoints.

mod config;
mod error;
mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aerorisk_core::ModelBundle;

pub use error::{ApiError, ApiResult};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "aerorisk_api=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("AeroRisk API server starting...");
    tracing::info!("Artifacts directory: {}", config.artifacts_dir.display());

    // Load the trained artifact set (read-only for the process lifetime)
    let bundle = match ModelBundle::load(&config.artifacts_dir) {
        Ok(bundle) => {
            tracing::info!(
                "Model bundle loaded: {} features, threshold {:.4}",
                bundle.preprocessor.n_features(),
                bundle.threshold.threshold
            );
            Some(Arc::new(bundle))
        }
        Err(e) => {
            tracing::error!("Model bundle unavailable: {}", e);
            tracing::error!("Run the `train` binary to generate the artifacts");
            None
        }
    };

    // Build application state
    let state = AppState {
        bundle,
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// None when the artifacts failed to load at startup.
    pub bundle: Option<Arc<ModelBundle>>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root::info))
        .route("/health", get(handlers::health::check))
        .route("/metricas", get(handlers::metrics::read))
        .route("/prever", post(handlers::predict::single))
        .route("/prever_lote", post(handlers::predict::batch))
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
