use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin/alerts` (admin only).
///
/// ```text
/// GET    /               -> list_all_alerts
/// PATCH  /{id}/status    -> update_alert_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::list_all_alerts))
        .route("/{id}/status", patch(admin::update_alert_status))
}
