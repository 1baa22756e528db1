use std::sync::Arc;

use safestep_alerts::{AlertDispatcher, AlertLifecycleManager, AlertStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone; everything is behind `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (health checks).
    pub pool: safestep_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Read access to alerts for listing, lookup, and stats.
    pub alerts: Arc<dyn AlertStore>,
    /// Alert submission and notification fan-out.
    pub dispatcher: Arc<AlertDispatcher>,
    /// Resolution of active alerts.
    pub lifecycle: Arc<AlertLifecycleManager>,
}
