use std::sync::Arc;

use crate::rejection::coach::RejectionCoach;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Explanation pipeline. Owns the LLM client and the per-caller rate limiter.
    pub coach: Arc<RejectionCoach>,
}
