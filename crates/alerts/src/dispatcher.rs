//! Alert submission and notification fan-out.
//!
//! [`AlertDispatcher::submit`] does validation, contact lookup, and the store
//! insert in sequence, then returns. Each contact's email and the owner's
//! confirmation are sent from their own background task on a shared
//! [`TaskTracker`], so shutdown can drain them.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use safestep_core::alert::{Alert, AlertRequest, AlertSummary, NewAlert};
use safestep_core::contact::{ActiveContact, AlertOwner};
use safestep_core::status::NotificationStatus;
use tokio_util::task::TaskTracker;
use tracing::Instrument;

use crate::directory::ContactDirectory;
use crate::error::AlertError;
use crate::sender::{ConfirmationSender, NotificationSender};
use crate::store::AlertStore;

pub struct AlertDispatcher {
    contacts: Arc<dyn ContactDirectory>,
    store: Arc<dyn AlertStore>,
    notifier: Arc<dyn NotificationSender>,
    confirmer: Arc<dyn ConfirmationSender>,
    tracker: TaskTracker,
}

impl AlertDispatcher {
    pub fn new(
        contacts: Arc<dyn ContactDirectory>,
        store: Arc<dyn AlertStore>,
        notifier: Arc<dyn NotificationSender>,
        confirmer: Arc<dyn ConfirmationSender>,
    ) -> Self {
        Self {
            contacts,
            store,
            notifier,
            confirmer,
            tracker: TaskTracker::new(),
        }
    }

    /// Record a new alert for `owner` and start notifying their contacts.
    ///
    /// Returns as soon as the alert is stored. Nothing is written when
    /// validation fails or the owner has no active contacts.
    pub async fn submit(
        &self,
        owner: &AlertOwner,
        request: AlertRequest,
    ) -> Result<AlertSummary, AlertError> {
        let (location, notes) = request.validate()?;

        let contacts = self.contacts.list_active(owner.id).await?;
        if contacts.is_empty() {
            tracing::info!(owner_id = owner.id, "Alert rejected: no active contacts");
            return Err(AlertError::NoContacts);
        }

        let draft = NewAlert::new(owner.id, location, notes, &contacts, Utc::now());
        let alert = self.store.create(draft).await?;

        tracing::info!(
            alert_id = alert.id,
            owner_id = owner.id,
            contacts = contacts.len(),
            "Emergency alert created",
        );

        let contact_count = contacts.len();
        for contact in contacts {
            self.spawn_notification(&alert, &owner.name, contact);
        }
        self.spawn_confirmation(&alert, owner.clone(), contact_count);

        Ok(alert.summary())
    }

    fn spawn_notification(&self, alert: &Alert, sender_name: &str, contact: ActiveContact) {
        let notifier = Arc::clone(&self.notifier);
        let store = Arc::clone(&self.store);
        let alert_id = alert.id;
        let location = alert.location.clone();
        let sender_name = sender_name.to_string();
        let span = tracing::info_span!("alert_notification", alert_id, contact_id = contact.id);

        self.tracker.spawn(
            async move {
                let status = match notifier
                    .send(&contact, &sender_name, &location, alert_id)
                    .await
                {
                    Ok(()) => NotificationStatus::Delivered,
                    Err(e) => {
                        tracing::warn!(error = %e, "Emergency notification failed");
                        NotificationStatus::Failed
                    }
                };

                match store
                    .update_delivery_status(alert_id, contact.id, status)
                    .await
                {
                    Ok(true) => tracing::debug!(%status, "Delivery status recorded"),
                    Ok(false) => tracing::warn!(%status, "Notification record not found"),
                    Err(e) => tracing::error!(error = %e, %status, "Failed to record delivery status"),
                }
            }
            .instrument(span),
        );
    }

    fn spawn_confirmation(&self, alert: &Alert, owner: AlertOwner, contact_count: usize) {
        let confirmer = Arc::clone(&self.confirmer);
        let alert_id = alert.id;
        let location = alert.location.clone();
        let span = tracing::info_span!("alert_confirmation", alert_id, owner_id = owner.id);

        self.tracker.spawn(
            async move {
                if let Err(e) = confirmer
                    .send(&owner, &location, alert_id, contact_count)
                    .await
                {
                    tracing::warn!(error = %e, "Alert confirmation failed");
                }
            }
            .instrument(span),
        );
    }

    /// Number of background deliveries still running.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Wait until every background delivery spawned so far has finished.
    /// The dispatcher keeps accepting alerts afterwards.
    pub async fn wait_idle(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    /// Wait for in-flight deliveries, giving up after `timeout`.
    ///
    /// Returns `true` if everything finished in time.
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        self.tracker.close();
        let pending = self.tracker.len();
        if pending > 0 {
            tracing::info!(pending, "Waiting for in-flight alert deliveries");
        }
        match tokio::time::timeout(timeout, self.tracker.wait()).await {
            Ok(()) => true,
            Err(_) => {
                tracing::warn!(
                    pending = self.tracker.len(),
                    "Shutdown timeout reached with deliveries still running",
                );
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
