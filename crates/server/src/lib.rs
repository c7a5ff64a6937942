//! # Server Crate
//!
//! The prediction side of the Cult Classic Calculator: a small axum
//! service that loads the trained model artifact once at startup and
//! scores movies on demand.
//!
//! ## Routes
//!
//! - `GET /` welcome message
//! - `POST /calculate` score a submitted movie
//!
//! The model is read-only after startup, so request handlers share it
//! through an `Arc` with no locking.

pub mod config;
pub mod error;
pub mod handlers;

use axum::routing::{get, post};
use axum::Router;
use model::ModelArtifact;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use axum::http::HeaderValue;
pub use config::Config;
pub use error::{AppError, AppResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub artifact: Arc<ModelArtifact>,
}

impl AppState {
    pub fn new(artifact: ModelArtifact) -> Self {
        Self {
            artifact: Arc::new(artifact),
        }
    }
}

/// Create the main router with all routes.
///
/// Browsers may only call the API from `allowed_origin`; methods and
/// headers are unrestricted within that origin.
pub fn create_router(state: AppState, allowed_origin: HeaderValue) -> Router {
    Router::new()
        .route("/", get(handlers::welcome))
        .route("/calculate", post(handlers::calculate))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(allowed_origin)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Bind the listener and serve until the process is stopped
pub async fn serve(addr: SocketAddr, app: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
