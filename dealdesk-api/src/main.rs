//! Deal Desk Legal Engine - Main Application Entry Point
//!
//! Serves the legal agreement rules engine over HTTP: rule evaluation,
//! Exhibit A normalization, and contract package rendering.

use dealdesk_api::AppState;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,dealdesk=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse::<u16>()
        .expect("PORT must be a valid u16");

    tracing::info!("Starting Deal Desk legal engine on {}:{}", host, port);

    // Load the rule pack once; a broken pack must stop startup rather
    // than surface at evaluation time.
    let app_state = Arc::new(AppState::from_env()?);
    tracing::info!(
        "Rule pack {} loaded ({} clauses, {} deep-dive modules)",
        app_state.pack.version,
        app_state.pack.clause_bank.len(),
        app_state.pack.deep_dive_modules.len()
    );

    // Build our application with routes
    let app = dealdesk_api::create_router(app_state);

    // Run it
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
