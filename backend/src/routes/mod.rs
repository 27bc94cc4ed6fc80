//! Route definitions for the spraying advisory platform

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/spraying-advice", post(handlers::get_spraying_advice))
        .route("/weather", post(handlers::get_current_weather))
}
