//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::MatchService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Match service for all bracket logic.
    pub match_service: Arc<MatchService>,
}
