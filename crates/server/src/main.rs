//! Cult Classic Calculator API server.
//!
//! Loads the trained model artifact and serves predictions over HTTP.
//! Configuration comes from environment variables (see [`Config`]),
//! with defaults that match the local frontend setup.

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use model::ModelArtifact;
use server::{create_router, AppState, Config};
use std::net::SocketAddr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!("Starting Cult Classic Calculator API");

    let artifact = ModelArtifact::load(Path::new(&config.model_path))
        .with_context(|| format!("loading model artifact from {}", config.model_path))?;
    info!(
        "Model ready: {} features, {} genres in vocabulary",
        artifact.tree().n_features(),
        artifact.schema().genres().len()
    );

    let origin = HeaderValue::from_str(&config.allowed_origin)
        .with_context(|| format!("invalid CORS origin {}", config.allowed_origin))?;
    let app = create_router(AppState::new(artifact), origin);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    server::serve(addr, app).await
}
