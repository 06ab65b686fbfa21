//! RAG Server binary
//!
//! Run with: cargo run -p grounded-rag --bin grounded-rag-server [config.toml]

use grounded_rag::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "grounded_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match std::env::args().nth(1) {
        Some(path) => RagConfig::from_file(&path)?,
        None => RagConfig::from_env()?,
    };
    config.log_summary();

    // Create and start server
    let server = RagServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /token      - Get a bearer token");
    println!("  POST /api/query  - Ask questions");
    println!("  GET  /api/info   - API info");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
