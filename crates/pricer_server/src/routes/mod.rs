//! Route modules for the pricer server
//!
//! - index: static HTML pricing form
//! - health: liveness and readiness checks
//! - pricing: Monte Carlo and lattice pricing endpoints

pub mod error;
pub mod health;
pub mod index;
pub mod pricing;

pub use error::ApiError;

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(config: Arc<ServerConfig>) -> Self {
        Self {
            config,
            start_time: std::time::Instant::now(),
        }
    }
}

/// Build the main application router by merging all route modules
pub fn build_router(config: Arc<ServerConfig>) -> Router {
    let state = AppState::new(config);

    Router::new()
        .merge(index::routes())
        .merge(health::routes())
        .merge(pricing::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
