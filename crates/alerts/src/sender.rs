//! Outbound delivery seams.
//!
//! Each call is a single attempt; callers record the outcome and never retry.

use std::time::Duration;

use async_trait::async_trait;
use safestep_core::alert::Location;
use safestep_core::contact::{ActiveContact, AlertOwner};
use safestep_core::types::DbId;

/// Why a single delivery attempt did not reach the transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryFailure {
    #[error("email delivery is not configured")]
    NotConfigured,

    #[error("delivery timed out after {}s", .0.as_secs())]
    TimedOut(Duration),

    #[error("{0}")]
    Rejected(String),
}

/// Sends the emergency message to one contact.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(
        &self,
        contact: &ActiveContact,
        sender_name: &str,
        location: &Location,
        alert_id: DbId,
    ) -> Result<(), DeliveryFailure>;
}

/// Sends the acknowledgement back to the user who raised the alert.
#[async_trait]
pub trait ConfirmationSender: Send + Sync {
    async fn send(
        &self,
        owner: &AlertOwner,
        location: &Location,
        alert_id: DbId,
        contact_count: usize,
    ) -> Result<(), DeliveryFailure>;
}
