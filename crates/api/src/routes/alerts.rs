//! Route definitions for the `/emergency-alerts` resource.
//!
//! All endpoints require authentication.

use axum::routing::get;
use axum::Router;

use crate::handlers::alerts;
use crate::state::AppState;

/// Routes mounted at `/emergency-alerts`.
///
/// ```text
/// POST   /          -> submit_alert
/// GET    /          -> list_alerts
/// GET    /stats     -> alert_stats
/// GET    /{id}      -> get_alert
/// PATCH  /{id}      -> resolve_alert
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(alerts::list_alerts).post(alerts::submit_alert))
        .route("/stats", get(alerts::alert_stats))
        .route("/{id}", get(alerts::get_alert).patch(alerts::resolve_alert))
}
