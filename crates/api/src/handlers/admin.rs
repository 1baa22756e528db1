//! Admin handlers for alerts across all users.
//!
//! All endpoints require the `admin` role via [`RequireAdmin`].

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use safestep_alerts::ResolveRequest;
use safestep_core::alert::{Alert, AlertFilter};
use safestep_core::error::CoreError;
use safestep_core::pagination::{PageInfo, PageRequest, DEFAULT_ADMIN_PAGE_LIMIT};
use safestep_core::status::AlertStatus;
use safestep_core::types::DbId;
use serde::{Deserialize, Serialize};

use super::alerts::AlertMessageResponse;
use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::rbac::RequireAdmin;
use crate::query::{parse_date_bound, parse_status_filter, AdminAlertListParams, DateBound};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAlertStatusBody {
    pub status: Option<String>,
    pub admin_notes: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminPagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_alerts: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Debug, Serialize)]
pub struct AdminAlertListResponse {
    pub alerts: Vec<Alert>,
    pub pagination: AdminPagination,
}

/// GET /api/v1/admin/alerts
///
/// Every user's alerts, newest first. Supports `status`, `page`, `limit`,
/// `dateFrom`, and `dateTo`.
pub async fn list_all_alerts(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<AdminAlertListParams>,
) -> AppResult<impl IntoResponse> {
    let filter = AlertFilter {
        owner_id: None,
        status: parse_status_filter(params.status.as_deref())?,
        created_from: parse_date_bound(params.date_from.as_deref(), DateBound::Start)?,
        created_to: parse_date_bound(params.date_to.as_deref(), DateBound::End)?,
    };
    let page = PageRequest::new(params.page, params.limit, DEFAULT_ADMIN_PAGE_LIMIT);

    let (alerts, total) = state.alerts.list(&filter, page).await?;
    let info = PageInfo::new(page, total);

    Ok(Json(AdminAlertListResponse {
        alerts,
        pagination: AdminPagination {
            current_page: info.page,
            total_pages: info.total_pages,
            total_alerts: info.total_items,
            has_next: info.has_next,
            has_prev: info.has_prev,
        },
    }))
}

/// PATCH /api/v1/admin/alerts/{id}/status
///
/// Resolve any user's active alert. `status` is required; `adminNotes`
/// replaces the alert notes with an admin timestamp appended.
pub async fn update_alert_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(alert_id): AppPath<DbId>,
    AppJson(body): AppJson<UpdateAlertStatusBody>,
) -> AppResult<impl IntoResponse> {
    let status: AlertStatus = body
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CoreError::Validation("Status is required".into()))?
        .parse()
        .map_err(|_| CoreError::Validation("Invalid status".into()))?;

    let request = ResolveRequest {
        status: Some(status),
        notes: body.admin_notes,
    };
    let alert = state
        .lifecycle
        .resolve_any(alert_id, admin.user_id, request)
        .await?;

    tracing::info!(alert_id, admin_id = admin.user_id, %status, "Alert status updated by admin");

    Ok(Json(AlertMessageResponse {
        message: "Alert status updated successfully",
        alert,
    }))
}
