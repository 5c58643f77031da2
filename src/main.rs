use anyhow::Result;
use slm_processor::{
    config::Config,
    handlers::{router, AppState},
    services::{verifier_for, NotificationProcessor, RedisStore},
};
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration; a missing variable stops the process here
    let config = Config::from_env()?;

    tracing::info!("Starting SLM processor v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {:?}", config.environment);

    // Initialize services
    let store = Arc::new(
        RedisStore::connect(&config.redis_url, config.table.clone(), config.seller_key.clone())
            .await?,
    );
    let verifier = verifier_for(config.signature_scheme, config.marketplace_salt.clone());
    let processor = NotificationProcessor::new(verifier, store);

    let app = router(AppState::new(processor)).layer(
        TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default().include_headers(true)),
    );

    // Start server
    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl+c: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down gracefully...");
}
