use async_trait::async_trait;
use safestep_core::alert::{Alert, AlertFilter, AlertScope, AlertStats, NewAlert, Resolution};
use safestep_core::contact::ActiveContact;
use safestep_core::pagination::PageRequest;
use safestep_core::status::{AlertStatus, NotificationStatus};
use safestep_core::types::DbId;
use safestep_db::repositories::{AlertRepo, ContactRepo};
use sqlx::PgPool;

use crate::directory::ContactDirectory;
use crate::error::StoreError;
use crate::store::{AlertStore, ResolveOutcome};

/// Alert store backed by the `alerts` and `alert_notifications` tables.
#[derive(Debug, Clone)]
pub struct PgAlertStore {
    pool: PgPool,
}

impl PgAlertStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlertStore for PgAlertStore {
    async fn create(&self, alert: NewAlert) -> Result<Alert, StoreError> {
        Ok(AlertRepo::create(&self.pool, &alert).await?)
    }

    async fn update_delivery_status(
        &self,
        alert_id: DbId,
        contact_id: DbId,
        status: NotificationStatus,
    ) -> Result<bool, StoreError> {
        Ok(AlertRepo::update_notification_status(&self.pool, alert_id, contact_id, status).await?)
    }

    async fn get(&self, id: DbId, scope: AlertScope) -> Result<Option<Alert>, StoreError> {
        Ok(AlertRepo::find(&self.pool, id, scope).await?)
    }

    async fn list(
        &self,
        filter: &AlertFilter,
        page: PageRequest,
    ) -> Result<(Vec<Alert>, i64), StoreError> {
        let alerts = AlertRepo::list(&self.pool, filter, page.limit, page.offset()).await?;
        let total = AlertRepo::count(&self.pool, filter).await?;
        Ok((alerts, total))
    }

    async fn resolve(
        &self,
        id: DbId,
        scope: AlertScope,
        resolution: Resolution,
    ) -> Result<ResolveOutcome, StoreError> {
        if let Some(alert) = AlertRepo::resolve(&self.pool, id, scope, &resolution).await? {
            return Ok(ResolveOutcome::Resolved(alert));
        }

        // The conditional update matched nothing: tell "gone" from "not active".
        match AlertRepo::find_status(&self.pool, id, scope).await? {
            None => Ok(ResolveOutcome::NotFound),
            Some(status_id) => {
                let status = AlertStatus::from_id(status_id).ok_or_else(|| {
                    sqlx::Error::Decode(format!("unknown status_id {status_id}").into())
                })?;
                Ok(ResolveOutcome::NotActive(status))
            }
        }
    }

    async fn stats(&self, owner_id: DbId) -> Result<AlertStats, StoreError> {
        Ok(AlertRepo::stats(&self.pool, owner_id).await?)
    }
}

/// Contact directory backed by the `emergency_contacts` table.
#[derive(Debug, Clone)]
pub struct PgContactDirectory {
    pool: PgPool,
}

impl PgContactDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactDirectory for PgContactDirectory {
    async fn list_active(&self, owner_id: DbId) -> Result<Vec<ActiveContact>, StoreError> {
        let contacts = ContactRepo::list_active(&self.pool, owner_id).await?;
        Ok(contacts.into_iter().map(ActiveContact::from).collect())
    }
}
