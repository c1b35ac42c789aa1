//! Opportunity desk server
//!
//! Hosts one session behind the JSON/SSE API.

use opportunity_desk::adapters::{
    FixtureIngestion, GenerationAdapter, HttpGeneration, HttpIngestion, IngestionAdapter,
    LoggingGeneration, LoggingIngestion, ScriptedGeneration,
};
use opportunity_desk::api::{create_router, AppState};
use opportunity_desk::config::DeskConfig;
use opportunity_desk::runtime::SessionHandle;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "opportunity_desk=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = DeskConfig::from_env()?;

    let ingestion: Arc<dyn IngestionAdapter> = match &config.ingestion_url {
        Some(url) => {
            tracing::info!(endpoint = %url, "Using HTTP ingestion");
            Arc::new(HttpIngestion::new(url.clone(), config.http_timeout)?)
        }
        None => {
            tracing::info!(delay = ?config.ingestion_delay, "Using fixture ingestion");
            Arc::new(FixtureIngestion::new(config.ingestion_delay))
        }
    };

    let generation: Arc<dyn GenerationAdapter> = match &config.generation_url {
        Some(url) => {
            tracing::info!(endpoint = %url, "Using HTTP generation");
            Arc::new(HttpGeneration::new(url.clone(), config.http_timeout)?)
        }
        None => {
            tracing::info!(
                delay = ?config.generation_delay,
                "Using scripted generation"
            );
            Arc::new(ScriptedGeneration::new(config.generation_delay))
        }
    };

    let session = SessionHandle::spawn(
        LoggingIngestion::new(ingestion),
        LoggingGeneration::new(generation),
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(AppState::new(session))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(compression);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Opportunity desk listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
