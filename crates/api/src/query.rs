//! Shared query parameter types for alert listing endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use safestep_core::error::CoreError;
use safestep_core::status::AlertStatus;
use safestep_core::types::Timestamp;
use serde::Deserialize;

/// `GET /emergency-alerts?status=&page=&limit=`
#[derive(Debug, Default, Deserialize)]
pub struct AlertListParams {
    pub status: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// `GET /admin/alerts?status=&page=&limit=&dateFrom=&dateTo=`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAlertListParams {
    pub status: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// RFC 3339 timestamp or `YYYY-MM-DD` (start of day, UTC).
    pub date_from: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD` (end of day, UTC).
    pub date_to: Option<String>,
}

/// Parse an optional status filter. Blank means "no filter".
pub fn parse_status_filter(raw: Option<&str>) -> Result<Option<AlertStatus>, CoreError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| CoreError::Validation(format!("Invalid status filter '{value}'"))),
    }
}

/// Which end of a date range a bare date stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    Start,
    End,
}

/// Parse an optional date-range bound.
pub fn parse_date_bound(raw: Option<&str>, bound: DateBound) -> Result<Option<Timestamp>, CoreError> {
    let Some(value) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| CoreError::Validation(format!("Invalid date '{value}'")))?;
    let time = match bound {
        DateBound::Start => date.and_hms_opt(0, 0, 0),
        DateBound::End => date.and_hms_milli_opt(23, 59, 59, 999),
    };
    time.map(|t| Some(t.and_utc()))
        .ok_or_else(|| CoreError::Validation(format!("Invalid date '{value}'")))
}
