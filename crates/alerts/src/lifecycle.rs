//! Alert status transitions.
//!
//! Only `active -> resolved | false_alarm` is allowed. The store applies the
//! change as a compare-and-set on `active`, so concurrent resolutions of the
//! same alert produce exactly one winner.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use safestep_core::alert::{validate_notes, Alert, AlertScope, Resolution};
use safestep_core::error::CoreError;
use safestep_core::status::AlertStatus;
use safestep_core::types::DbId;

use crate::error::AlertError;
use crate::store::{AlertStore, ResolveOutcome};

/// Requested terminal status and optional replacement notes.
#[derive(Debug, Clone, Default)]
pub struct ResolveRequest {
    /// Defaults to `resolved`.
    pub status: Option<AlertStatus>,
    pub notes: Option<String>,
}

pub struct AlertLifecycleManager {
    store: Arc<dyn AlertStore>,
}

impl AlertLifecycleManager {
    pub fn new(store: Arc<dyn AlertStore>) -> Self {
        Self { store }
    }

    /// Resolve one of `owner_id`'s own alerts.
    pub async fn resolve(
        &self,
        alert_id: DbId,
        owner_id: DbId,
        request: ResolveRequest,
    ) -> Result<Alert, AlertError> {
        let notes = validate_notes(request.notes)?;
        self.transition(
            alert_id,
            AlertScope::Owner(owner_id),
            owner_id,
            request.status,
            notes,
        )
        .await
    }

    /// Resolve any user's alert on behalf of an administrator.
    ///
    /// Notes are stamped with `(Admin: <timestamp>)`.
    pub async fn resolve_any(
        &self,
        alert_id: DbId,
        admin_id: DbId,
        request: ResolveRequest,
    ) -> Result<Alert, AlertError> {
        let notes = validate_notes(request.notes)?.map(|text| {
            format!(
                "{text} (Admin: {})",
                Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
            )
        });
        self.transition(alert_id, AlertScope::Any, admin_id, request.status, notes)
            .await
    }

    async fn transition(
        &self,
        alert_id: DbId,
        scope: AlertScope,
        acting_user: DbId,
        status: Option<AlertStatus>,
        notes: Option<String>,
    ) -> Result<Alert, AlertError> {
        let status = status.unwrap_or(AlertStatus::Resolved);
        if !AlertStatus::Active.can_transition_to(status) {
            return Err(CoreError::Validation(
                "Status must be either resolved or false_alarm".into(),
            )
            .into());
        }

        let resolution = Resolution {
            status,
            notes,
            resolved_by: acting_user,
            resolved_at: Utc::now(),
        };

        match self.store.resolve(alert_id, scope, resolution).await? {
            ResolveOutcome::Resolved(alert) => {
                tracing::info!(alert_id, acting_user, %status, "Alert resolved");
                Ok(alert)
            }
            ResolveOutcome::NotActive(current) => Err(AlertError::InvalidTransition { status: current }),
            ResolveOutcome::NotFound => Err(CoreError::NotFound {
                entity: "Alert",
                id: alert_id,
            }
            .into()),
        }
    }
}
