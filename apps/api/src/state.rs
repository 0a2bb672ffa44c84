use std::sync::Arc;

use crate::config::Config;
use crate::pipeline::gateway::CoachGateway;

/// Shared application state injected into all route handlers via Axum
/// extractors. The gateway is the only contended resource; everything else
/// is read-only configuration.
#[derive(Clone)]
pub struct AppState {
    /// Capability boundary to the text-generation service. Swappable so
    /// tests can script gateway outcomes without a network.
    pub gateway: Arc<dyn CoachGateway>,
    pub config: Config,
}
