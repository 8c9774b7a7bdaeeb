use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool is reference-counted and the rest sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: hvacdesk_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Workflows publish lifecycle events here after their transaction commits.
    pub event_bus: Arc<hvacdesk_events::EventBus>,
}
