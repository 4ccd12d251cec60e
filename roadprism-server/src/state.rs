use std::sync::Arc;

use roadprism_core::RoadGraph;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Road network, loaded once at start-up
    pub graph: Arc<RoadGraph>,
    /// Detour ratio used when a request does not set its own
    pub detour_ratio: f64,
}

impl AppState {
    pub fn new(graph: RoadGraph, detour_ratio: f64) -> Self {
        Self {
            graph: Arc::new(graph),
            detour_ratio,
        }
    }
}
