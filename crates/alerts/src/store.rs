//! Durable alert records.

use async_trait::async_trait;
use chrono::Utc;
use safestep_core::alert::{Alert, AlertFilter, AlertScope, AlertStats, NewAlert, Resolution};
use safestep_core::pagination::PageRequest;
use safestep_core::status::{AlertStatus, NotificationStatus};
use safestep_core::types::DbId;
use tokio::sync::RwLock;

use crate::error::StoreError;

/// Result of a compare-and-set resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveOutcome {
    Resolved(Alert),
    /// The alert exists in scope but is no longer `active`.
    NotActive(AlertStatus),
    NotFound,
}

#[async_trait]
pub trait AlertStore: Send + Sync {
    /// Persist a new `active` alert with its notification snapshot.
    async fn create(&self, alert: NewAlert) -> Result<Alert, StoreError>;

    /// Update the single record keyed by `(alert_id, contact_id)`.
    ///
    /// Returns `false` when no such record exists.
    async fn update_delivery_status(
        &self,
        alert_id: DbId,
        contact_id: DbId,
        status: NotificationStatus,
    ) -> Result<bool, StoreError>;

    async fn get(&self, id: DbId, scope: AlertScope) -> Result<Option<Alert>, StoreError>;

    /// Alerts matching `filter`, newest first, plus the unpaged total.
    async fn list(
        &self,
        filter: &AlertFilter,
        page: PageRequest,
    ) -> Result<(Vec<Alert>, i64), StoreError>;

    /// Apply `resolution` only if the alert is still `active`.
    async fn resolve(
        &self,
        id: DbId,
        scope: AlertScope,
        resolution: Resolution,
    ) -> Result<ResolveOutcome, StoreError>;

    async fn stats(&self, owner_id: DbId) -> Result<AlertStats, StoreError>;
}

// ---------------------------------------------------------------------------
// InMemoryAlertStore
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Inner {
    next_id: DbId,
    alerts: Vec<Alert>,
}

/// Alert store held in process memory. Used by tests and local runs without
/// a database.
#[derive(Debug, Default)]
pub struct InMemoryAlertStore {
    inner: RwLock<Inner>,
}

impl InMemoryAlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored alerts across all owners.
    pub async fn len(&self) -> usize {
        self.inner.read().await.alerts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl AlertStore for InMemoryAlertStore {
    async fn create(&self, alert: NewAlert) -> Result<Alert, StoreError> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let now = Utc::now();
        let alert = Alert {
            id: inner.next_id,
            owner_id: alert.owner_id,
            location: alert.location,
            status: AlertStatus::Active,
            notes: alert.notes,
            contacts_notified: alert.contacts_notified,
            resolved_at: None,
            resolved_by: None,
            created_at: now,
            updated_at: now,
        };
        inner.alerts.push(alert.clone());
        Ok(alert)
    }

    async fn update_delivery_status(
        &self,
        alert_id: DbId,
        contact_id: DbId,
        status: NotificationStatus,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(alert) = inner.alerts.iter_mut().find(|a| a.id == alert_id) else {
            return Ok(false);
        };
        let Some(record) = alert
            .contacts_notified
            .iter_mut()
            .find(|r| r.contact_id == contact_id)
        else {
            return Ok(false);
        };
        record.notification_status = status;
        alert.updated_at = Utc::now();
        Ok(true)
    }

    async fn get(&self, id: DbId, scope: AlertScope) -> Result<Option<Alert>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .alerts
            .iter()
            .find(|a| a.id == id && scope.permits(a.owner_id))
            .cloned())
    }

    async fn list(
        &self,
        filter: &AlertFilter,
        page: PageRequest,
    ) -> Result<(Vec<Alert>, i64), StoreError> {
        let inner = self.inner.read().await;
        let mut matching: Vec<&Alert> = inner.alerts.iter().filter(|a| filter.matches(a)).collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as i64;
        let alerts = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .cloned()
            .collect();
        Ok((alerts, total))
    }

    async fn resolve(
        &self,
        id: DbId,
        scope: AlertScope,
        resolution: Resolution,
    ) -> Result<ResolveOutcome, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(alert) = inner
            .alerts
            .iter_mut()
            .find(|a| a.id == id && scope.permits(a.owner_id))
        else {
            return Ok(ResolveOutcome::NotFound);
        };
        if alert.status != AlertStatus::Active {
            return Ok(ResolveOutcome::NotActive(alert.status));
        }

        alert.status = resolution.status;
        alert.resolved_at = Some(resolution.resolved_at);
        alert.resolved_by = Some(resolution.resolved_by);
        if let Some(notes) = resolution.notes {
            alert.notes = Some(notes);
        }
        alert.updated_at = Utc::now();
        Ok(ResolveOutcome::Resolved(alert.clone()))
    }

    async fn stats(&self, owner_id: DbId) -> Result<AlertStats, StoreError> {
        let inner = self.inner.read().await;
        let mut stats = AlertStats::default();
        for alert in inner.alerts.iter().filter(|a| a.owner_id == owner_id) {
            stats.add(alert.status, 1);
        }
        Ok(stats)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
