pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::rejection::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/rejections/explain", post(handlers::handle_explain))
        .route("/api/v1/rejections/patterns", post(handlers::handle_patterns))
        .with_state(state)
}
