//! Emergency alert domain types.
//!
//! An [`Alert`] is one emergency raised by a user. It embeds one
//! [`NotificationRecord`] per contact that was eligible when the alert was
//! created; records are snapshots and never follow later contact edits.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::contact::ActiveContact;
use crate::error::CoreError;
use crate::status::{AlertStatus, NotificationStatus};
use crate::types::{DbId, Timestamp};

/// Maximum length of a free-text address.
pub const MAX_ADDRESS_LEN: u64 = 500;

/// Maximum length of alert notes.
pub const MAX_NOTES_LEN: u64 = 1000;

/// Shown in messages when the user did not supply an address.
pub const ADDRESS_NOT_SPECIFIED: &str = "Location not specified";

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// Geographic position attached to an alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Location {
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    pub longitude: f64,
    #[validate(length(max = 500, message = "Address must be at most 500 characters"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Location {
    /// Build a validated location. Blank addresses are dropped.
    pub fn new(latitude: f64, longitude: f64, address: Option<String>) -> Result<Self, CoreError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(CoreError::Validation(
                "Location coordinates must be numeric".into(),
            ));
        }
        let location = Self {
            latitude,
            longitude,
            address: normalize_text(address),
        };
        location
            .validate()
            .map_err(|e| CoreError::Validation(first_message(&e)))?;
        Ok(location)
    }

    /// Address for display, falling back to [`ADDRESS_NOT_SPECIFIED`].
    pub fn display_address(&self) -> &str {
        self.address.as_deref().unwrap_or(ADDRESS_NOT_SPECIFIED)
    }

    /// Google Maps link pointing at the coordinates.
    pub fn maps_url(&self) -> String {
        format!(
            "https://www.google.com/maps?q={},{}",
            self.latitude, self.longitude
        )
    }
}

// ---------------------------------------------------------------------------
// AlertRequest
// ---------------------------------------------------------------------------

/// Raw alert request as received from a client, before validation.
///
/// Coordinates are optional here so that a missing value surfaces as a
/// validation error instead of a deserialization failure.
#[derive(Debug, Clone, Default)]
pub struct AlertRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl AlertRequest {
    /// Validate the request, returning the location and normalized notes.
    ///
    /// Zero is a valid coordinate; only an absent value is rejected.
    pub fn validate(self) -> Result<(Location, Option<String>), CoreError> {
        let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) else {
            return Err(CoreError::Validation(
                "Location coordinates are required".into(),
            ));
        };
        let location = Location::new(latitude, longitude, self.address)?;
        let notes = validate_notes(self.notes)?;
        Ok((location, notes))
    }
}

/// Trim notes, drop blank ones, and enforce [`MAX_NOTES_LEN`].
pub fn validate_notes(notes: Option<String>) -> Result<Option<String>, CoreError> {
    let notes = normalize_text(notes);
    if let Some(text) = &notes {
        if text.chars().count() as u64 > MAX_NOTES_LEN {
            return Err(CoreError::Validation(format!(
                "Notes must be at most {MAX_NOTES_LEN} characters"
            )));
        }
    }
    Ok(notes)
}

fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Pick the first human-readable message out of a validator error set.
fn first_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string())
}

// ---------------------------------------------------------------------------
// Alert / NotificationRecord
// ---------------------------------------------------------------------------

/// Per-contact delivery slot embedded in an [`Alert`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    pub contact_id: DbId,
    pub name: String,
    pub email: String,
    pub notified_at: Timestamp,
    pub notification_status: NotificationStatus,
}

impl NotificationRecord {
    /// Snapshot a contact into a fresh record with status `sent`.
    pub fn snapshot(contact: &ActiveContact, notified_at: Timestamp) -> Self {
        Self {
            contact_id: contact.id,
            name: contact.name.clone(),
            email: contact.email.clone(),
            notified_at,
            notification_status: NotificationStatus::Sent,
        }
    }
}

/// One emergency event raised by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: DbId,
    pub owner_id: DbId,
    pub location: Location,
    pub status: AlertStatus,
    pub notes: Option<String>,
    pub contacts_notified: Vec<NotificationRecord>,
    pub resolved_at: Option<Timestamp>,
    pub resolved_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Alert {
    /// The record for `contact_id`, if the contact was notified.
    pub fn record(&self, contact_id: DbId) -> Option<&NotificationRecord> {
        self.contacts_notified
            .iter()
            .find(|r| r.contact_id == contact_id)
    }

    /// Compact view returned to the user right after submission.
    pub fn summary(&self) -> AlertSummary {
        AlertSummary {
            id: self.id,
            status: self.status,
            location: self.location.clone(),
            contacts_notified: self.contacts_notified.len(),
            created_at: self.created_at,
        }
    }
}

/// Input for persisting a new alert. The store assigns `id` and timestamps.
#[derive(Debug, Clone)]
pub struct NewAlert {
    pub owner_id: DbId,
    pub location: Location,
    pub notes: Option<String>,
    pub contacts_notified: Vec<NotificationRecord>,
}

impl NewAlert {
    /// Snapshot `contacts` into `sent` records stamped with `now`.
    pub fn new(
        owner_id: DbId,
        location: Location,
        notes: Option<String>,
        contacts: &[ActiveContact],
        now: Timestamp,
    ) -> Self {
        Self {
            owner_id,
            location,
            notes,
            contacts_notified: contacts
                .iter()
                .map(|c| NotificationRecord::snapshot(c, now))
                .collect(),
        }
    }
}

/// Response body for a freshly submitted alert.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSummary {
    pub id: DbId,
    pub status: AlertStatus,
    pub location: Location,
    /// Number of contacts the alert is being sent to.
    pub contacts_notified: usize,
    pub created_at: Timestamp,
}

/// A terminal transition applied to an active alert.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub status: AlertStatus,
    /// Replaces the existing notes when `Some`.
    pub notes: Option<String>,
    pub resolved_by: DbId,
    pub resolved_at: Timestamp,
}

/// Whose alerts a read or transition may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertScope {
    /// Only alerts raised by this user.
    Owner(DbId),
    /// Any alert (admin access).
    Any,
}

impl AlertScope {
    pub fn owner_id(self) -> Option<DbId> {
        match self {
            Self::Owner(id) => Some(id),
            Self::Any => None,
        }
    }

    /// Whether an alert owned by `owner_id` is visible in this scope.
    pub fn permits(self, owner_id: DbId) -> bool {
        self.owner_id().map_or(true, |id| id == owner_id)
    }
}

/// Listing filter. `None` fields do not constrain the result.
#[derive(Debug, Clone, Default)]
pub struct AlertFilter {
    pub owner_id: Option<DbId>,
    pub status: Option<AlertStatus>,
    pub created_from: Option<Timestamp>,
    pub created_to: Option<Timestamp>,
}

impl AlertFilter {
    pub fn for_owner(owner_id: DbId) -> Self {
        Self {
            owner_id: Some(owner_id),
            ..Self::default()
        }
    }

    pub fn matches(&self, alert: &Alert) -> bool {
        self.owner_id.map_or(true, |id| id == alert.owner_id)
            && self.status.map_or(true, |s| s == alert.status)
            && self.created_from.map_or(true, |t| alert.created_at >= t)
            && self.created_to.map_or(true, |t| alert.created_at <= t)
    }
}

/// Per-owner counts of alerts by status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertStats {
    pub total: i64,
    pub active: i64,
    pub resolved: i64,
    pub false_alarm: i64,
}

impl AlertStats {
    /// Add `count` alerts with `status` to the tally.
    pub fn add(&mut self, status: AlertStatus, count: i64) {
        self.total += count;
        match status {
            AlertStatus::Active => self.active += count,
            AlertStatus::Resolved => self.resolved += count,
            AlertStatus::FalseAlarm => self.false_alarm += count,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
