//! Repository for the `emergency_contacts` table (read side).

use safestep_core::types::DbId;
use sqlx::PgPool;

use crate::models::contact::EmergencyContact;

/// Column list for `emergency_contacts` queries.
const COLUMNS: &str =
    "id, owner_id, name, email, phone, relationship, is_active, created_at, updated_at";

/// Read access to a user's emergency contacts.
pub struct ContactRepo;

impl ContactRepo {
    /// List the owner's active contacts in creation order.
    pub async fn list_active(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<EmergencyContact>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM emergency_contacts \
             WHERE owner_id = $1 AND is_active = true \
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, EmergencyContact>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }
}
