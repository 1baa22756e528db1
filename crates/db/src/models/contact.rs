//! Emergency contact row model.

use safestep_core::contact::ActiveContact;
use safestep_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `emergency_contacts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EmergencyContact {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub relationship: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<EmergencyContact> for ActiveContact {
    fn from(row: EmergencyContact) -> Self {
        ActiveContact {
            id: row.id,
            name: row.name,
            email: row.email,
        }
    }
}
