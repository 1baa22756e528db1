//! Scripted collaborators for unit tests.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use safestep_core::alert::Location;
use safestep_core::contact::{ActiveContact, AlertOwner};
use safestep_core::types::DbId;

use crate::directory::ContactDirectory;
use crate::error::StoreError;
use crate::sender::{ConfirmationSender, DeliveryFailure, NotificationSender};

/// Notification sender that fails for listed addresses and optionally
/// sleeps before answering.
#[derive(Default)]
pub struct ScriptedNotifier {
    failing: HashSet<String>,
    delay: Option<Duration>,
    pub attempts: Mutex<Vec<DbId>>,
}

impl ScriptedNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(mut self, email: &str) -> Self {
        self.failing.insert(email.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.lock().unwrap().len()
    }
}

#[async_trait]
impl NotificationSender for ScriptedNotifier {
    async fn send(
        &self,
        contact: &ActiveContact,
        _sender_name: &str,
        _location: &Location,
        _alert_id: DbId,
    ) -> Result<(), DeliveryFailure> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.attempts.lock().unwrap().push(contact.id);
        if self.failing.contains(&contact.email) {
            return Err(DeliveryFailure::Rejected("mailbox unavailable".into()));
        }
        Ok(())
    }
}

/// Confirmation sender that records each call.
#[derive(Default)]
pub struct RecordingConfirmer {
    fail: bool,
    pub calls: Mutex<Vec<(DbId, usize)>>,
}

impl RecordingConfirmer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl ConfirmationSender for RecordingConfirmer {
    async fn send(
        &self,
        _owner: &AlertOwner,
        _location: &Location,
        alert_id: DbId,
        contact_count: usize,
    ) -> Result<(), DeliveryFailure> {
        self.calls.lock().unwrap().push((alert_id, contact_count));
        if self.fail {
            return Err(DeliveryFailure::NotConfigured);
        }
        Ok(())
    }
}

/// Directory whose lookups always fail.
pub struct UnavailableDirectory;

#[async_trait]
impl ContactDirectory for UnavailableDirectory {
    async fn list_active(&self, _owner_id: DbId) -> Result<Vec<ActiveContact>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }
}

pub fn owner() -> AlertOwner {
    AlertOwner {
        id: 1,
        name: "Sam".into(),
        email: "sam@example.com".into(),
    }
}
