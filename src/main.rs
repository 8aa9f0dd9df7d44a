mod assemble;
mod batch;
mod fields;
mod images;
mod models;
mod openai;
mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use routes::{content_overview, run_prompts, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{fmt, EnvFilter};

use crate::fields::ContentStore;
use crate::images::ImageCatalog;
use crate::openai::{LlmConfig, OpenAiClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Init tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let config = LlmConfig::from_env()?;
    tracing::info!("Using model {} via {}", config.model, config.base_url);

    let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "data".into());
    let image_dir = std::env::var("IMAGE_DIR").unwrap_or_else(|_| "static/images".into());

    let state = AppState {
        store: ContentStore::new(data_dir),
        catalog: ImageCatalog::new(image_dir),
        llm: Arc::new(OpenAiClient::new(config)),
    };

    let app = Router::new()
        .route("/api/prompts", post(run_prompts))
        .route("/api/content", get(content_overview))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let port: u16 = std::env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
