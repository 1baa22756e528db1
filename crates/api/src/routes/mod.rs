pub mod admin;
pub mod alerts;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /emergency-alerts                  submit, list (own alerts)
/// /emergency-alerts/stats            counts by status
/// /emergency-alerts/{id}             get, resolve
///
/// /admin/alerts                      list all (admin only)
/// /admin/alerts/{id}/status          update status (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/emergency-alerts", alerts::router())
        .nest("/admin/alerts", admin::router())
}
