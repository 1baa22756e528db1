//! Handlers for the `/emergency-alerts` resource.
//!
//! Every endpoint acts on the authenticated user's own alerts.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use safestep_alerts::ResolveRequest;
use safestep_core::alert::{Alert, AlertFilter, AlertRequest, AlertScope, AlertSummary};
use safestep_core::error::CoreError;
use safestep_core::pagination::{PageInfo, PageRequest, DEFAULT_PAGE_LIMIT};
use safestep_core::status::AlertStatus;
use safestep_core::types::DbId;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::query::{parse_status_filter, AlertListParams};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

/// A coordinate as sent by clients: a JSON number or a numeric string.
///
/// Any other JSON value lands in `Other` and is rejected during validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CoordinateInput {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl CoordinateInput {
    /// Blank text counts as absent.
    fn into_value(self) -> Result<Option<f64>, CoreError> {
        match self {
            Self::Number(n) => Ok(Some(n)),
            Self::Text(s) if s.trim().is_empty() => Ok(None),
            Self::Text(s) => s.trim().parse().map(Some).map_err(|_| not_numeric()),
            Self::Other(_) => Err(not_numeric()),
        }
    }
}

fn not_numeric() -> CoreError {
    CoreError::Validation("Location coordinates must be numeric".into())
}

#[derive(Debug, Deserialize)]
pub struct SubmitAlertBody {
    pub latitude: Option<CoordinateInput>,
    pub longitude: Option<CoordinateInput>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl SubmitAlertBody {
    fn into_request(self) -> Result<AlertRequest, CoreError> {
        Ok(AlertRequest {
            latitude: self.latitude.map(CoordinateInput::into_value).transpose()?.flatten(),
            longitude: self.longitude.map(CoordinateInput::into_value).transpose()?.flatten(),
            address: self.address,
            notes: self.notes,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ResolveAlertBody {
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitAlertResponse {
    pub message: &'static str,
    pub alert: AlertSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current: i64,
    /// Number of pages.
    pub total: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Debug, Serialize)]
pub struct AlertListResponse {
    pub alerts: Vec<Alert>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct AlertMessageResponse {
    pub message: &'static str,
    pub alert: Alert,
}

/// Parse a requested terminal status. `None` keeps the default.
pub(crate) fn parse_target_status(raw: Option<&str>) -> Result<Option<AlertStatus>, CoreError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| {
            CoreError::Validation("Status must be either resolved or false_alarm".into())
        }),
    }
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

/// POST /api/v1/emergency-alerts
///
/// Record an alert and start notifying the caller's active contacts.
/// Returns 201 as soon as the alert is stored.
pub async fn submit_alert(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(body): AppJson<SubmitAlertBody>,
) -> AppResult<impl IntoResponse> {
    let request = body.into_request()?;
    let summary = state.dispatcher.submit(&auth.as_owner(), request).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitAlertResponse {
            message: "Emergency alert sent successfully",
            alert: summary,
        }),
    ))
}

// ---------------------------------------------------------------------------
// List / get
// ---------------------------------------------------------------------------

/// GET /api/v1/emergency-alerts
///
/// The caller's alerts, newest first. Supports `status`, `page`, `limit`.
pub async fn list_alerts(
    auth: AuthUser,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<AlertListParams>,
) -> AppResult<impl IntoResponse> {
    let filter = AlertFilter {
        status: parse_status_filter(params.status.as_deref())?,
        ..AlertFilter::for_owner(auth.user_id)
    };
    let page = PageRequest::new(params.page, params.limit, DEFAULT_PAGE_LIMIT);

    let (alerts, total) = state.alerts.list(&filter, page).await?;
    let info = PageInfo::new(page, total);

    Ok(Json(AlertListResponse {
        alerts,
        pagination: Pagination {
            current: info.page,
            total: info.total_pages,
            has_next: info.has_next,
            has_prev: info.has_prev,
        },
    }))
}

/// GET /api/v1/emergency-alerts/{id}
pub async fn get_alert(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(alert_id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let alert = state
        .alerts
        .get(alert_id, AlertScope::Owner(auth.user_id))
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Alert",
            id: alert_id,
        }))?;
    Ok(Json(alert))
}

// ---------------------------------------------------------------------------
// Resolve
// ---------------------------------------------------------------------------

/// PATCH /api/v1/emergency-alerts/{id}
///
/// Mark an active alert `resolved` (default) or `false_alarm`. The body is
/// optional; a request without `Content-Type` counts as empty.
pub async fn resolve_alert(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(alert_id): AppPath<DbId>,
    body: Result<Option<Json<ResolveAlertBody>>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let body = body?.map(|Json(b)| b).unwrap_or_default();
    let request = ResolveRequest {
        status: parse_target_status(body.status.as_deref())?,
        notes: body.notes,
    };

    let alert = state
        .lifecycle
        .resolve(alert_id, auth.user_id, request)
        .await?;

    Ok(Json(AlertMessageResponse {
        message: "Alert resolved successfully",
        alert,
    }))
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// GET /api/v1/emergency-alerts/stats
pub async fn alert_stats(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let stats = state.alerts.stats(auth.user_id).await?;
    Ok(Json(stats))
}
