//! Deal Desk Legal Engine API
//!
//! REST surface over the legal agreement rules engine: rule evaluation,
//! contract package rendering, and rule pack introspection.

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Rule pack introspection
        .route("/api/pack", get(handlers::get_pack))
        .route("/api/clauses", get(handlers::list_clauses))
        .route("/api/clauses/:id", get(handlers::get_clause))
        // Engine
        .route("/api/evaluate", post(handlers::evaluate))
        .route("/api/render", post(handlers::render))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
