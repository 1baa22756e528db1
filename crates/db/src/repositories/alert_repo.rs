//! Repository for the `alerts` and `alert_notifications` tables.

use std::collections::HashMap;

use safestep_core::alert::{Alert, AlertFilter, AlertScope, AlertStats, NewAlert, Resolution};
use safestep_core::status::{AlertStatus, NotificationStatus, StatusId};
use safestep_core::types::DbId;
use sqlx::PgPool;

use crate::models::alert::{AlertRow, NotificationRow, StatusCount};

/// Column list for `alerts` queries.
const COLUMNS: &str = "id, owner_id, latitude, longitude, address, status_id, notes, \
                       resolved_at, resolved_by, created_at, updated_at";

/// Column list for `alert_notifications` queries.
const NOTIFICATION_COLUMNS: &str =
    "alert_id, contact_id, name, email, notified_at, notification_status_id";

/// Shared WHERE clause for filtered listing; `NULL` binds disable a predicate.
const FILTER_CLAUSE: &str = "($1::BIGINT IS NULL OR owner_id = $1) \
     AND ($2::SMALLINT IS NULL OR status_id = $2) \
     AND ($3::TIMESTAMPTZ IS NULL OR created_at >= $3) \
     AND ($4::TIMESTAMPTZ IS NULL OR created_at <= $4)";

/// Provides persistence operations for emergency alerts.
pub struct AlertRepo;

impl AlertRepo {
    /// Insert an alert and its notification snapshot in one transaction.
    pub async fn create(pool: &PgPool, input: &NewAlert) -> Result<Alert, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO alerts (owner_id, latitude, longitude, address, status_id, notes) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        let alert = sqlx::query_as::<_, AlertRow>(&query)
            .bind(input.owner_id)
            .bind(input.location.latitude)
            .bind(input.location.longitude)
            .bind(input.location.address.as_deref())
            .bind(AlertStatus::Active.id())
            .bind(input.notes.as_deref())
            .fetch_one(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO alert_notifications \
                 (alert_id, contact_id, position, name, email, notified_at, notification_status_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {NOTIFICATION_COLUMNS}"
        );
        let mut records = Vec::with_capacity(input.contacts_notified.len());
        for (position, record) in input.contacts_notified.iter().enumerate() {
            let row = sqlx::query_as::<_, NotificationRow>(&query)
                .bind(alert.id)
                .bind(record.contact_id)
                .bind(position as i32)
                .bind(&record.name)
                .bind(&record.email)
                .bind(record.notified_at)
                .bind(record.notification_status.id())
                .fetch_one(&mut *tx)
                .await?;
            records.push(row);
        }

        tx.commit().await?;
        alert.into_alert(records)
    }

    /// Find an alert by id, restricted to `scope`.
    pub async fn find(
        pool: &PgPool,
        id: DbId,
        scope: AlertScope,
    ) -> Result<Option<Alert>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM alerts \
             WHERE id = $1 AND ($2::BIGINT IS NULL OR owner_id = $2)"
        );
        let row = sqlx::query_as::<_, AlertRow>(&query)
            .bind(id)
            .bind(scope.owner_id())
            .fetch_optional(pool)
            .await?;

        match row {
            Some(row) => {
                let mut records = Self::records_for(pool, &[row.id]).await?;
                let own = records.remove(&row.id).unwrap_or_default();
                row.into_alert(own).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Current status id of an alert, restricted to `scope`.
    pub async fn find_status(
        pool: &PgPool,
        id: DbId,
        scope: AlertScope,
    ) -> Result<Option<StatusId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT status_id FROM alerts \
             WHERE id = $1 AND ($2::BIGINT IS NULL OR owner_id = $2)",
        )
        .bind(id)
        .bind(scope.owner_id())
        .fetch_optional(pool)
        .await
    }

    /// List alerts matching `filter`, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &AlertFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Alert>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM alerts \
             WHERE {FILTER_CLAUSE} \
             ORDER BY created_at DESC, id DESC \
             LIMIT $5 OFFSET $6"
        );
        let rows = sqlx::query_as::<_, AlertRow>(&query)
            .bind(filter.owner_id)
            .bind(filter.status.map(AlertStatus::id))
            .bind(filter.created_from)
            .bind(filter.created_to)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();
        let mut records = Self::records_for(pool, &ids).await?;

        rows.into_iter()
            .map(|row| {
                let own = records.remove(&row.id).unwrap_or_default();
                row.into_alert(own)
            })
            .collect()
    }

    /// Count alerts matching `filter`.
    pub async fn count(pool: &PgPool, filter: &AlertFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM alerts WHERE {FILTER_CLAUSE}");
        sqlx::query_scalar(&query)
            .bind(filter.owner_id)
            .bind(filter.status.map(AlertStatus::id))
            .bind(filter.created_from)
            .bind(filter.created_to)
            .fetch_one(pool)
            .await
    }

    /// Set the delivery status of the single record keyed by
    /// `(alert_id, contact_id)`.
    ///
    /// Returns `false` if no such record exists.
    pub async fn update_notification_status(
        pool: &PgPool,
        alert_id: DbId,
        contact_id: DbId,
        status: NotificationStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE alert_notifications \
             SET notification_status_id = $3, updated_at = NOW() \
             WHERE alert_id = $1 AND contact_id = $2",
        )
        .bind(alert_id)
        .bind(contact_id)
        .bind(status.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Move an active alert to a terminal status.
    ///
    /// The update only matches while the alert is still `active`, so two
    /// racing resolutions cannot both succeed. Returns `None` when nothing
    /// matched (missing, out of scope, or already terminal).
    pub async fn resolve(
        pool: &PgPool,
        id: DbId,
        scope: AlertScope,
        resolution: &Resolution,
    ) -> Result<Option<Alert>, sqlx::Error> {
        let query = format!(
            "UPDATE alerts \
             SET status_id = $3, resolved_at = $4, resolved_by = $5, \
                 notes = COALESCE($6, notes), updated_at = NOW() \
             WHERE id = $1 AND ($2::BIGINT IS NULL OR owner_id = $2) AND status_id = $7 \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, AlertRow>(&query)
            .bind(id)
            .bind(scope.owner_id())
            .bind(resolution.status.id())
            .bind(resolution.resolved_at)
            .bind(resolution.resolved_by)
            .bind(resolution.notes.as_deref())
            .bind(AlertStatus::Active.id())
            .fetch_optional(pool)
            .await?;

        match row {
            Some(row) => {
                let mut records = Self::records_for(pool, &[row.id]).await?;
                let own = records.remove(&row.id).unwrap_or_default();
                row.into_alert(own).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Count an owner's alerts grouped by status.
    pub async fn stats(pool: &PgPool, owner_id: DbId) -> Result<AlertStats, sqlx::Error> {
        let groups = sqlx::query_as::<_, StatusCount>(
            "SELECT status_id, COUNT(*) AS count FROM alerts \
             WHERE owner_id = $1 \
             GROUP BY status_id",
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        let mut stats = AlertStats::default();
        for group in groups {
            match AlertStatus::from_id(group.status_id) {
                Some(status) => stats.add(status, group.count),
                None => tracing::warn!(status_id = group.status_id, "Unknown alert status id"),
            }
        }
        Ok(stats)
    }

    /// Load notification rows for the given alerts, grouped by alert and
    /// ordered by their original position.
    async fn records_for(
        pool: &PgPool,
        alert_ids: &[DbId],
    ) -> Result<HashMap<DbId, Vec<NotificationRow>>, sqlx::Error> {
        if alert_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let query = format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM alert_notifications \
             WHERE alert_id = ANY($1) \
             ORDER BY alert_id, position"
        );
        let rows = sqlx::query_as::<_, NotificationRow>(&query)
            .bind(alert_ids)
            .fetch_all(pool)
            .await?;

        let mut grouped: HashMap<DbId, Vec<NotificationRow>> = HashMap::new();
        for row in rows {
            grouped.entry(row.alert_id).or_default().push(row);
        }
        Ok(grouped)
    }
}
