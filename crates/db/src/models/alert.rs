//! Alert and alert-notification row models.
//!
//! Rows are flat; [`AlertRow::into_alert`] assembles them into the nested
//! [`Alert`] domain type.

use safestep_core::alert::{Alert, Location, NotificationRecord};
use safestep_core::status::{AlertStatus, NotificationStatus, StatusId};
use safestep_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `alerts` table.
#[derive(Debug, Clone, FromRow)]
pub struct AlertRow {
    pub id: DbId,
    pub owner_id: DbId,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub status_id: StatusId,
    pub notes: Option<String>,
    pub resolved_at: Option<Timestamp>,
    pub resolved_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `alert_notifications` table.
#[derive(Debug, Clone, FromRow)]
pub struct NotificationRow {
    pub alert_id: DbId,
    pub contact_id: DbId,
    pub name: String,
    pub email: String,
    pub notified_at: Timestamp,
    pub notification_status_id: StatusId,
}

/// One `(status_id, count)` group from the stats query.
#[derive(Debug, Clone, FromRow)]
pub struct StatusCount {
    pub status_id: StatusId,
    pub count: i64,
}

impl NotificationRow {
    pub fn into_record(self) -> Result<NotificationRecord, sqlx::Error> {
        let status = NotificationStatus::from_id(self.notification_status_id).ok_or_else(|| {
            unknown_status("notification_status_id", self.notification_status_id)
        })?;
        Ok(NotificationRecord {
            contact_id: self.contact_id,
            name: self.name,
            email: self.email,
            notified_at: self.notified_at,
            notification_status: status,
        })
    }
}

impl AlertRow {
    /// Combine the alert row with its notification rows (already ordered).
    pub fn into_alert(self, records: Vec<NotificationRow>) -> Result<Alert, sqlx::Error> {
        let status = AlertStatus::from_id(self.status_id)
            .ok_or_else(|| unknown_status("status_id", self.status_id))?;
        let contacts_notified = records
            .into_iter()
            .map(NotificationRow::into_record)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Alert {
            id: self.id,
            owner_id: self.owner_id,
            location: Location {
                latitude: self.latitude,
                longitude: self.longitude,
                address: self.address,
            },
            status,
            notes: self.notes,
            contacts_notified,
            resolved_at: self.resolved_at,
            resolved_by: self.resolved_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn unknown_status(column: &str, id: StatusId) -> sqlx::Error {
    sqlx::Error::Decode(format!("unknown {column} {id}").into())
}
